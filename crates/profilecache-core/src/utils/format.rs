use crate::models::GeoPoint;

/// Format a phone number for display.
/// Ten-digit (or 1-prefixed eleven-digit) numbers become (XXX) XXX-XXXX;
/// anything else is returned unchanged since most nationalities differ.
pub fn format_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    match digits.len() {
        10 => format!("({}) {}-{}", &digits[0..3], &digits[3..6], &digits[6..10]),
        11 if digits.starts_with('1') => {
            format!("({}) {}-{}", &digits[1..4], &digits[4..7], &digits[7..11])
        }
        _ => phone.to_string(),
    }
}

/// Truncate a string to at most `max_len` characters, adding an ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Format a birth date such as `1993-07-20T09:44:18.674Z` as `Jul 20, 1993`
pub fn format_birth_date(date: &str) -> String {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(date) {
        dt.format("%b %d, %Y").to_string()
    } else if date.len() >= 10 {
        date.chars().take(10).collect()
    } else {
        date.to_string()
    }
}

/// `12.3456° N, 98.7654° W`
pub fn format_coordinates(point: GeoPoint) -> String {
    let ns = if point.latitude < 0.0 { 'S' } else { 'N' };
    let ew = if point.longitude < 0.0 { 'W' } else { 'E' };
    format!(
        "{:.4}° {}, {:.4}° {}",
        point.latitude.abs(),
        ns,
        point.longitude.abs(),
        ew
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_phone() {
        assert_eq!(format_phone("5551234567"), "(555) 123-4567");
        assert_eq!(format_phone("15551234567"), "(555) 123-4567");
        assert_eq!(format_phone("(272) 790-0888"), "(272) 790-0888");
        assert_eq!(format_phone("015242 88788"), "015242 88788");
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Zoë Müller", 10), "Zoë Müller");
        assert_eq!(truncate_string("abcdef", 2), "ab");
    }

    #[test]
    fn test_format_birth_date() {
        assert_eq!(format_birth_date("1993-07-20T09:44:18.674Z"), "Jul 20, 1993");
        assert_eq!(format_birth_date("1993-07-20 garbage"), "1993-07-20");
        assert_eq!(format_birth_date("n/a"), "n/a");
    }

    #[test]
    fn test_format_coordinates() {
        let point = GeoPoint {
            latitude: -69.8246,
            longitude: 134.8719,
        };
        assert_eq!(format_coordinates(point), "69.8246° S, 134.8719° E");
    }
}
