use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidateUrl;

lazy_static! {
    /// Spreadsheet links must be absolute http(s) URLs with a host
    /// - Valid: "https://example.com/sheet", "http://sheets.local/d/1"
    /// - Invalid: "ftp://example.com", "example.com/sheet", "https://"
    pub static ref SPREADSHEET_URL_REGEX: Regex =
        Regex::new(r"^(?i)https?://[^\s/?#]+([/?#]\S*)?$").unwrap();
}

/// Check that a URL is shaped like a spreadsheet link
pub fn is_spreadsheet_url(url: &str) -> bool {
    SPREADSHEET_URL_REGEX.is_match(url) && url.validate_url()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spreadsheet_url_valid() {
        assert!(is_spreadsheet_url("https://example.com/sheet"));
        assert!(is_spreadsheet_url("http://sheets.local/d/1?gid=0"));
        assert!(is_spreadsheet_url("HTTPS://docs.example.org/spreadsheets/d/abc/edit#gid=1"));
    }

    #[test]
    fn test_spreadsheet_url_invalid() {
        assert!(!is_spreadsheet_url("")); // empty
        assert!(!is_spreadsheet_url("example.com/sheet")); // no scheme
        assert!(!is_spreadsheet_url("ftp://example.com/sheet")); // wrong scheme
        assert!(!is_spreadsheet_url("https://")); // no host
        assert!(!is_spreadsheet_url("https://exa mple.com")); // whitespace
    }
}
