use chrono::NaiveDate;

pub const CANONICAL_FORMAT: &str = "%Y-%m-%d";

/// Register date layouts, in priority order, with the number of digits the
/// year field must carry. chrono's `%Y` is lenient about width, so the year
/// width is checked up front to keep `01/02/24` from parsing as year 24.
const SOURCE_FORMATS: [(&str, usize); 3] = [
    ("%m/%d/%Y", 4),
    ("%Y-%m-%d", 4),
    ("%m/%d/%y", 2),
];

pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    SOURCE_FORMATS
        .iter()
        .filter(|(format, digits)| year_field(text, format).is_some_and(|y| y.len() == *digits))
        .find_map(|(format, _)| NaiveDate::parse_from_str(text, format).ok())
}

/// Render a register date as `YYYY-MM-DD`. Dates in no recognized layout are
/// returned trimmed but otherwise untouched.
pub fn normalize_date(text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }
    match parse_date(text) {
        Some(date) => date.format(CANONICAL_FORMAT).to_string(),
        None => text.to_string(),
    }
}

fn year_field<'a>(text: &'a str, format: &str) -> Option<&'a str> {
    if format.starts_with("%Y") {
        text.split('-').next()
    } else {
        text.rsplit('/').next()
    }
}
