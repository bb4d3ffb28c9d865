use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};

use crate::constants::{api, list};
use crate::filter::{
    compile_filter, is_known_option, FilterCriteria, FilterOption, GENDER_OPTIONS, STATUS_OPTIONS,
};
use crate::router::{self, Route};

/// rmx - Rick and Morty API browser
///
/// Browse characters, locations and episodes from the command line.
/// Configuration priority: CLI args > Environment variables > Defaults
#[derive(Parser, Debug)]
#[command(name = "rmx")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Rick and Morty API browser", long_about = None)]
pub struct CliArgs {
    /// API base URL
    #[arg(long, global = true, env = "RMX_API_BASE")]
    pub api_base: Option<String>,

    /// Pages to load for list views (1-50)
    #[arg(long, global = true, env = "RMX_PAGES")]
    pub pages: Option<u32>,

    /// Route opened when no subcommand is given (e.g. "/episodes")
    #[arg(long, env = "RMX_DEFAULT_ROUTE")]
    pub default_route: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List characters
    Characters(ListArgs),
    /// List locations
    Locations(ListArgs),
    /// List episodes
    Episodes(ListArgs),
    /// Show one character with its origin, location and episodes
    Character {
        /// Character id
        id: Option<String>,
    },
    /// Open a route: "/", "/character/1", "#/locations", "rmx://v1/episodes"
    Open { route: String },
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// One-line query, e.g. "rick status:alive gender:male"
    pub query: Option<String>,

    /// Name search
    #[arg(short, long)]
    pub name: Option<String>,

    /// Status filter: alive, dead, unknown
    #[arg(short, long)]
    pub status: Option<String>,

    /// Gender filter: female, male, genderless, unknown
    #[arg(short, long)]
    pub gender: Option<String>,
}

impl ListArgs {
    /// Criteria from the query, then explicit flags on top
    fn criteria(&self) -> Result<FilterCriteria> {
        let mut criteria = self
            .query
            .as_deref()
            .map(compile_filter)
            .unwrap_or_default();

        if let Some(name) = &self.name {
            criteria.set("name", name.as_str());
        }
        if let Some(status) = &self.status {
            criteria.set("status", status.as_str());
        }
        if let Some(gender) = &self.gender {
            criteria.set("gender", gender.as_str());
        }

        if let Some(status) = criteria.get("status") {
            validate_option(status, STATUS_OPTIONS, "status")?;
        }
        if let Some(gender) = criteria.get("gender") {
            validate_option(gender, GENDER_OPTIONS, "gender")?;
        }
        Ok(criteria)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub api_base: String,
    pub pages: u32,
    pub route: Route,
    /// Criteria for the list on `route`; `None` leaves the list unfiltered
    pub criteria: Option<FilterCriteria>,
}

/// Validate that a value is within a given range (inclusive)
fn validate_in_range<T>(val: T, min: T, max: T, name: &str) -> Result<T>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if val < min || val > max {
        Err(anyhow!("{name} must be in range [{min}, {max}], got {val}"))
    } else {
        Ok(val)
    }
}

fn validate_option(value: &str, options: &[FilterOption], name: &str) -> Result<()> {
    if is_known_option(options, value) {
        return Ok(());
    }
    let valid: Vec<&str> = options.iter().map(|o| o.value).collect();
    Err(anyhow!(
        "Invalid {name} '{value}'. Valid options: {}",
        valid.join(", ")
    ))
}

/// Load configuration from CLI args and environment variables
/// Priority: CLI args > Environment variables > Defaults
pub fn load() -> Result<Config> {
    Config::from_args(CliArgs::parse())
}

impl Config {
    pub fn from_args(args: CliArgs) -> Result<Config> {
        let api_base = args
            .api_base
            .unwrap_or_else(|| api::DEFAULT_BASE.to_string());
        validate_url(&api_base, "RMX_API_BASE")?;

        let pages = args.pages.unwrap_or(1);
        let pages = validate_in_range(pages, 1, list::MAX_PAGES, "RMX_PAGES")?;

        let (route, criteria) = match args.command {
            Some(Command::Characters(a)) => (Route::Characters, Some(a.criteria()?)),
            Some(Command::Locations(a)) => (Route::Locations, Some(a.criteria()?)),
            Some(Command::Episodes(a)) => (Route::Episodes, Some(a.criteria()?)),
            Some(Command::Character { id }) => (Route::Character { id }, None),
            Some(Command::Open { route }) => (parse_route(&route)?, None),
            None => match args.default_route {
                Some(raw) => (
                    parse_route(&raw).context("RMX_DEFAULT_ROUTE is not a known route")?,
                    None,
                ),
                None => (Route::default(), None),
            },
        };

        Ok(Config {
            api_base,
            pages,
            route,
            criteria,
        })
    }

    /// Print current configuration (useful for debugging)
    pub fn print_summary(&self) {
        log::info!("rmx configuration:");
        log::info!("  API base: {}", self.api_base);
        log::info!("  Route: {}", self.route.to_path());
        if self.route.list_kind().is_some() {
            log::info!("  Pages: {}", self.pages);
        }
        if let Some(c) = self.criteria.as_ref().filter(|c| !c.is_empty()) {
            let pairs: Vec<String> = c.iter().map(|(k, v)| format!("{k}={v}")).collect();
            log::info!("  Filters: {}", pairs.join(" "));
        }
    }
}

fn parse_route(raw: &str) -> Result<Route> {
    router::parse(raw).ok_or_else(|| anyhow!("Unknown route '{raw}'"))
}

/// Validate URL format (basic check)
fn validate_url(url: &str, name: &str) -> Result<()> {
    if url.is_empty() {
        return Err(anyhow!("{name} cannot be empty"));
    }

    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(anyhow!("{name} must start with http:// or https://"))
    }
}
