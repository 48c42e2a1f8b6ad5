use once_cell::sync::Lazy;
use regex::Regex;

static FIRST_INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("valid regex"));

/// First run of digits in a savings text, ignoring whatever unit follows.
///
/// `"2-5 min"` and `"40-50%"` yield 2 and 40 alike. Summing these mixes
/// minutes with percentages; aggregate time savings keep that behavior.
pub fn leading_integer(text: &str) -> Option<u32> {
    FIRST_INTEGER
        .find(text)
        .and_then(|m| m.as_str().parse().ok())
}
