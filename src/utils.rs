/// Parses a numeric field the way the insight tables store it: surrounding
/// whitespace and a single trailing `%` are ignored. NaN and infinities count
/// as unparseable so they can never win a ranking.
pub fn parse_numeric(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Storage slug for a hedge fund: lowercase with every space removed.
pub fn fund_slug(fund_name: &str) -> String {
    fund_name.to_lowercase().replace(' ', "")
}

/// Venture funds are keyed by the first word of their name, lowercased.
pub fn venture_slug(fund_name: &str) -> String {
    fund_name
        .split(' ')
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

/// Drops the `", LP"` legal suffix used in some insight tables.
pub fn display_fund_name(fund_name: &str) -> String {
    fund_name.replace(", LP", "")
}

/// `"5.2"` becomes `"5.2%"`; values that are not numbers are returned as-is.
pub fn format_percentage(raw: &str) -> String {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => format!("{:.1}%", value),
        _ => raw.to_string(),
    }
}

/// Formats an amount as US dollars with thousands separators, e.g. `$1,234.50`.
pub fn format_usd(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = format!("{:.2}", amount.abs());
    let (whole, fraction) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}${}.{}", if negative { "-" } else { "" }, grouped, fraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numeric() {
        assert_eq!(parse_numeric("5.2"), Some(5.2));
        assert_eq!(parse_numeric(" -3 "), Some(-3.0));
        assert_eq!(parse_numeric("12.5%"), Some(12.5));
        assert_eq!(parse_numeric("N/A"), None);
        assert_eq!(parse_numeric(""), None);
        assert_eq!(parse_numeric("NaN"), None);
        assert_eq!(parse_numeric("inf"), None);
    }

    #[test]
    fn test_slugs() {
        assert_eq!(fund_slug("Greenlight Capital"), "greenlightcapital");
        assert_eq!(venture_slug("Sequoia Capital Fund"), "sequoia");
        assert_eq!(display_fund_name("Maran Partners Fund, LP"), "Maran Partners Fund");
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage("5.234"), "5.2%");
        assert_eq!(format_percentage("-1"), "-1.0%");
        assert_eq!(format_percentage("n.a."), "n.a.");
    }

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(0.5), "$0.50");
        assert_eq!(format_usd(1234.5), "$1,234.50");
        assert_eq!(format_usd(1_000_000.0), "$1,000,000.00");
        assert_eq!(format_usd(-999.999), "-$1,000.00");
    }
}
