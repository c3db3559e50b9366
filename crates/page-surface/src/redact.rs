//! Log redaction helpers. URLs and harvested text may carry user data;
//! everything that reaches a log line goes through here first.

use url::Url;

/// Strip query and fragment, keeping scheme, host, and path.
pub fn url(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(parsed) => format!(
            "{}://{}{}",
            parsed.scheme(),
            parsed.host_str().unwrap_or(""),
            parsed.path()
        ),
        Err(_) => raw.to_string(),
    }
}

/// Truncate to at most `max` characters, marking the cut.
pub fn text(raw: &str, max: usize) -> String {
    if raw.chars().count() <= max {
        return raw.to_string();
    }
    let mut truncated: String = raw.chars().take(max).collect();
    truncated.push_str("...");
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_drops_query_and_fragment() {
        assert_eq!(
            url("https://api.example.com/v1/items?token=secret#frag"),
            "https://api.example.com/v1/items"
        );
    }

    #[test]
    fn url_passes_through_unparseable_input() {
        assert_eq!(url("not a url"), "not a url");
    }

    #[test]
    fn text_truncates_on_char_boundaries() {
        assert_eq!(text("héllo wörld", 5), "héllo...");
        assert_eq!(text("short", 10), "short");
    }
}
