//! Lenient conversions for property values written by task scripts.

/// Parses `true` or `false`, ignoring case and surrounding whitespace.
pub fn parse_bool(text: &str) -> Option<bool> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Converts shell-style boolean text, falling back to `default`.
///
/// Accepts `1`, `true`, and `$true` (and their false counterparts) so values
/// coming from environment variables and PowerShell scripts behave alike.
pub fn convert_to_bool(text: Option<&str>, default: bool) -> bool {
    let Some(text) = text else {
        return default;
    };
    match text.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "$true" => true,
        "0" | "false" | "$false" => false,
        _ => default,
    }
}

/// Parses an integer percentage and clamps it to `0..=100`.
pub fn parse_percent(text: &str) -> Option<i32> {
    text.trim().parse::<i32>().ok().map(|p| p.clamp(0, 100))
}
