use serde::Serialize;

/// Format any serializable value as indented JSON
pub fn pretty<T: Serialize + ?Sized>(v: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(v)
}

/// Format JSON with truncation for oversized payloads
///
/// Cuts at the last complete line below `max_bytes` and appends a footer
/// with the full size.
pub fn pretty_safe<T: Serialize + ?Sized>(v: &T, max_bytes: usize) -> serde_json::Result<String> {
    let formatted = pretty(v)?;
    if formatted.len() <= max_bytes {
        return Ok(formatted);
    }

    let mut cut = max_bytes;
    while !formatted.is_char_boundary(cut) {
        cut -= 1;
    }
    let clean = match formatted[..cut].rfind('\n') {
        Some(nl) => &formatted[..nl],
        None => &formatted[..cut],
    };
    Ok(format!(
        "{clean}\n\n... (truncated - {} total bytes, showing first {} KB)\n",
        formatted.len(),
        max_bytes / 1024
    ))
}
