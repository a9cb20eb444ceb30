//! Pull the `Location` header out of collected response header lines.

/// First non-empty `Location` value, matched case-insensitively. Status
/// lines and other headers are skipped.
pub(crate) fn location_header(lines: &[String]) -> Option<String> {
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("location") {
                let value = value.trim();
                if !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn finds_location_after_status_line() {
        let headers = lines(&[
            "HTTP/1.1 301 Moved Permanently",
            "Location: https://long.example.com/page",
            "Content-Length: 0",
        ]);
        assert_eq!(
            location_header(&headers).as_deref(),
            Some("https://long.example.com/page")
        );
    }

    #[test]
    fn header_name_is_case_insensitive() {
        let headers = lines(&["HTTP/1.1 302 Found", "location: /relative/path"]);
        assert_eq!(location_header(&headers).as_deref(), Some("/relative/path"));
    }

    #[test]
    fn empty_location_is_ignored() {
        let headers = lines(&["HTTP/1.1 301 Moved Permanently", "Location: "]);
        assert_eq!(location_header(&headers), None);
    }

    #[test]
    fn no_location_header() {
        let headers = lines(&["HTTP/1.1 200 OK", "Content-Type: text/html"]);
        assert_eq!(location_header(&headers), None);
    }
}
