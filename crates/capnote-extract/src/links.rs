//! Internal/external link classification.
//!
//! Classification is by host naming convention only; no DNS lookups. The
//! `172.` rule is a plain prefix and therefore covers all of `172.0.0.0/8`,
//! not just the private `172.16.0.0/12` block. Internal links are never
//! fetched, so widening or narrowing this rule changes what leaves the host.

use url::Url;

const INTERNAL_HOST_PREFIXES: &[&str] = &["192.168.", "10.", "172."];
const INTERNAL_HOST_SUFFIXES: &[&str] = &[".local", ".lan"];

/// Whether `url` points at a private or local network.
///
/// Anything that does not parse, or has no host, is external.
pub fn is_internal_url(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    parsed.host_str().map(is_internal_host).unwrap_or(false)
}

fn is_internal_host(host: &str) -> bool {
    host == "localhost"
        || INTERNAL_HOST_PREFIXES.iter().any(|p| host.starts_with(p))
        || INTERNAL_HOST_SUFFIXES.iter().any(|s| host.ends_with(s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_private_ranges_are_internal() {
        assert!(is_internal_url("http://192.168.1.5/x"));
        assert!(is_internal_url("http://10.0.0.8:8080/dash"));
        assert!(is_internal_url("https://172.16.4.2/"));
    }

    #[test]
    fn test_172_prefix_is_coarse() {
        assert!(is_internal_url("http://172.32.0.1/x"));
    }

    #[test]
    fn test_local_names_are_internal() {
        assert!(is_internal_url("http://localhost:3000/"));
        assert!(is_internal_url("https://intra.local/report"));
        assert!(is_internal_url("http://nas.lan/share"));
        assert!(is_internal_url("http://LOCALHOST/"));
    }

    #[test]
    fn test_public_hosts_are_external() {
        assert!(!is_internal_url("http://8.8.8.8/x"));
        assert!(!is_internal_url("https://example.com/local"));
        assert!(!is_internal_url("https://local.example.com/"));
    }

    #[test]
    fn test_unparseable_is_external() {
        assert!(!is_internal_url("not a url"));
        assert!(!is_internal_url(""));
        assert!(!is_internal_url("mailto:someone@example.com"));
    }
}
