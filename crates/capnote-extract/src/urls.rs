//! URL extraction from free text.

use once_cell::sync::Lazy;
use regex::Regex;

/// `http(s)://` followed by letters, digits, the ASCII run `$`..`_`, the
/// marks `!*(),` and `%XX` escapes.
static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https?://(?:[a-zA-Z0-9$-_@.&+!*(),]|%[0-9a-fA-F]{2})+")
        .expect("URL pattern is valid")
});

/// Sentence punctuation that is dropped from the end of a match.
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', '\'', '"', '<', '>'];

/// Find every `http://` / `https://` URL in `text`.
///
/// Matches are returned in order of appearance and duplicates are kept.
///
/// ```
/// use capnote_extract::extract_urls;
///
/// let urls = extract_urls("read https://example.com/a, then http://example.org");
/// assert_eq!(urls, vec!["https://example.com/a", "http://example.org"]);
/// ```
pub fn extract_urls(text: &str) -> Vec<String> {
    URL_PATTERN
        .find_iter(text)
        .filter_map(|m| {
            let url = trim_trailing(m.as_str());
            let (_, rest) = url.split_once("://")?;
            if rest.is_empty() {
                None
            } else {
                Some(url.to_string())
            }
        })
        .collect()
}

fn trim_trailing(mut url: &str) -> &str {
    loop {
        let Some(last) = url.chars().last() else {
            return url;
        };
        let drop = TRAILING_PUNCTUATION.contains(&last)
            || (last == ')' && unbalanced(url, '(', ')'))
            || (last == ']' && unbalanced(url, '[', ']'));
        if !drop {
            return url;
        }
        url = &url[..url.len() - last.len_utf8()];
    }
}

fn unbalanced(s: &str, open: char, close: char) -> bool {
    s.matches(close).count() > s.matches(open).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_urls() {
        assert!(extract_urls("").is_empty());
        assert!(extract_urls("just a memo about ftp and www.example.com").is_empty());
        assert!(extract_urls("http:/ broken and https:// alone").is_empty());
    }

    #[test]
    fn test_url_mid_sentence() {
        assert_eq!(
            extract_urls("look at https://example.com/a when you can"),
            vec!["https://example.com/a"]
        );
    }

    #[test]
    fn test_trailing_punctuation_excluded() {
        for text in [
            "see https://example.com/a.",
            "see https://example.com/a, ok",
            "is it https://example.com/a?",
            "(https://example.com/a)",
            "\"https://example.com/a\"",
        ] {
            assert_eq!(extract_urls(text), vec!["https://example.com/a"], "{text}");
        }
    }

    #[test]
    fn test_balanced_parentheses_kept() {
        assert_eq!(
            extract_urls("https://en.wikipedia.org/wiki/Rust_(programming_language)"),
            vec!["https://en.wikipedia.org/wiki/Rust_(programming_language)"]
        );
    }

    #[test]
    fn test_query_and_percent_escapes() {
        assert_eq!(
            extract_urls("https://example.com/s?q=a%20b&page=2 next"),
            vec!["https://example.com/s?q=a%20b&page=2"]
        );
    }

    #[test]
    fn test_stops_at_non_ascii() {
        assert_eq!(
            extract_urls("文章https://mp.weixin.qq.com/s/abc看看"),
            vec!["https://mp.weixin.qq.com/s/abc"]
        );
    }

    #[test]
    fn test_duplicates_and_order_preserved() {
        assert_eq!(
            extract_urls("http://b.example http://a.example http://b.example"),
            vec!["http://b.example", "http://a.example", "http://b.example"]
        );
    }
}
