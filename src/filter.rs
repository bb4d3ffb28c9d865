use std::collections::BTreeMap;

use crate::types::EntityKind;

/// Search text and filters for a list endpoint.
///
/// Free-text search and the `name` filter are the same parameter. Keys are
/// stored lowercased; setting an empty value removes the key, so "absent" and
/// "empty" mean the same thing (unconstrained).
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    values: BTreeMap<String, String>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Criteria with only the free-text search set
    pub fn with_name(name: impl Into<String>) -> Self {
        Self::new().with("name", name)
    }

    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let key = key.trim().to_lowercase();
        let value = value.into().trim().to_string();
        if key.is_empty() {
            return;
        }
        if value.is_empty() {
            self.values.remove(&key);
        } else {
            self.values.insert(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(&key.to_lowercase()).map(|s| s.as_str())
    }

    pub fn name(&self) -> Option<&str> {
        self.get("name")
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Query parameters for `kind`'s list endpoint.
    ///
    /// Keys the endpoint does not understand are dropped.
    pub fn query_pairs(&self, kind: EntityKind) -> Vec<(&str, &str)> {
        let allowed = kind.filter_keys();
        self.iter()
            .filter(|(k, _)| {
                let ok = allowed.contains(k);
                if !ok {
                    log::debug!("[filter] dropping '{k}' (not a {kind} filter)");
                }
                ok
            })
            .collect()
    }
}

/// Parse a one-line query such as `rick status:alive gender:male`.
///
/// `key:value` tokens set filters; bare words are joined into the
/// free-text name. Unknown keys are kept as part of the name so nothing the
/// user typed silently disappears.
pub fn compile_filter(q: &str) -> FilterCriteria {
    let mut f = FilterCriteria::default();
    let mut free: Vec<String> = Vec::new();

    for tok in q.split_whitespace() {
        let mut it = tok.splitn(2, ':');
        if let (Some(k), Some(v)) = (it.next(), it.next()) {
            match canonical_key(k) {
                Some(key) => f.set(key, v),
                None => free.push(tok.to_string()),
            }
        } else {
            free.push(tok.to_string());
        }
    }

    if !free.is_empty() {
        f.set("name", free.join(" "));
    }
    f
}

fn canonical_key(k: &str) -> Option<&'static str> {
    match &*k.to_lowercase() {
        "name" | "n" => Some("name"),
        "status" | "state" => Some("status"),
        "gender" | "sex" => Some("gender"),
        "species" => Some("species"),
        "type" => Some("type"),
        "dimension" | "dim" => Some("dimension"),
        "episode" | "ep" | "code" => Some("episode"),
        _ => None,
    }
}

/// One selectable value of a filter dropdown
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FilterOption {
    pub value: &'static str,
    pub label: &'static str,
}

pub const STATUS_OPTIONS: &[FilterOption] = &[
    FilterOption { value: "alive", label: "Alive" },
    FilterOption { value: "dead", label: "Dead" },
    FilterOption { value: "unknown", label: "Unknown" },
];

pub const GENDER_OPTIONS: &[FilterOption] = &[
    FilterOption { value: "female", label: "Female" },
    FilterOption { value: "male", label: "Male" },
    FilterOption { value: "genderless", label: "Genderless" },
    FilterOption { value: "unknown", label: "Unknown" },
];

pub fn is_known_option(options: &[FilterOption], value: &str) -> bool {
    options.iter().any(|o| o.value.eq_ignore_ascii_case(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_value_removes_key() {
        let mut f = FilterCriteria::new().with("status", "alive");
        assert_eq!(f.get("status"), Some("alive"));

        f.set("status", "   ");
        assert_eq!(f.get("status"), None);
        assert!(f.is_empty());
    }

    #[test]
    fn test_query_pairs_drop_unknown_keys() {
        let f = FilterCriteria::with_name("rick")
            .with("status", "alive")
            .with("dimension", "C-137");

        let pairs = f.query_pairs(EntityKind::Character);
        assert!(pairs.contains(&("name", "rick")));
        assert!(pairs.contains(&("status", "alive")));
        assert!(!pairs.iter().any(|(k, _)| *k == "dimension"));

        // Locations only keep name + dimension here
        let pairs = f.query_pairs(EntityKind::Location);
        assert_eq!(pairs, vec![("dimension", "C-137"), ("name", "rick")]);
    }

    #[test]
    fn test_compile_filter_mixed_tokens() {
        let f = compile_filter("rick sanchez status:Dead sex:male");
        assert_eq!(f.name(), Some("rick sanchez"));
        assert_eq!(f.get("status"), Some("Dead"));
        assert_eq!(f.get("gender"), Some("male"));
    }

    #[test]
    fn test_compile_filter_unknown_key_stays_in_name() {
        let f = compile_filter("foo:bar");
        assert_eq!(f.name(), Some("foo:bar"));
    }

    #[test]
    fn test_clear_drops_search_and_filters() {
        let mut f = compile_filter("morty status:alive gender:male");
        assert!(!f.is_empty());
        f.clear();
        assert!(f.is_empty());
        assert!(f.query_pairs(EntityKind::Character).is_empty());
    }

    #[test]
    fn test_compile_filter_empty() {
        assert!(compile_filter("   ").is_empty());
    }

    #[test]
    fn test_known_options() {
        assert!(is_known_option(STATUS_OPTIONS, "Alive"));
        assert!(is_known_option(GENDER_OPTIONS, "genderless"));
        assert!(!is_known_option(STATUS_OPTIONS, "zombie"));
    }
}
