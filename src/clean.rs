use tracing::debug;

/// Listing titles are truncated by the site with a trailing " ..." marker.
/// Nothing else is normalized.
pub fn clean_title(raw: &str) -> String {
    raw.replace(" ...", "")
}

/// Strip the pound-sign prefix and parse the remainder as a float.
///
/// The site serves Latin-1 pound signs that show up as the mojibake
/// sequence "Â£" under a wrong decode, so both spellings are stripped.
/// Anything that still fails to parse is recorded as missing, not an error.
pub fn parse_price(raw: &str) -> Option<f64> {
    let cleaned = raw
        .trim()
        .trim_start_matches("Â£")
        .trim_start_matches('£')
        .trim_start();
    match cleaned.parse::<f64>() {
        Ok(value) => Some(value),
        Err(_) => {
            debug!(raw, "unparseable price, recording as missing");
            None
        }
    }
}

/// Map the second class token of a rating element ("star-rating Three")
/// to 1..=5. A missing or unrecognized token maps to 0, which is also what
/// a genuine zero-star rating would look like.
pub fn rating_value(classes: &[&str]) -> u8 {
    match classes.get(1).copied() {
        Some("One") => 1,
        Some("Two") => 2,
        Some("Three") => 3,
        Some("Four") => 4,
        Some("Five") => 5,
        _ => 0,
    }
}

// ── Tests ──
