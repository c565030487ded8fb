//! Stored response snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A captured HTTP response: everything needed to replay it to a caller
/// later, plus the time it was stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseSnapshot {
    /// Final URL the response was fetched from (after redirects).
    pub url: String,
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    pub cached_at: DateTime<Utc>,
}

impl ResponseSnapshot {
    pub fn new(url: String, status: u16, headers: Vec<(String, String)>, body: Vec<u8>) -> Self {
        Self {
            url,
            status,
            headers,
            body,
            cached_at: Utc::now(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// First header value matching `name`, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn age_minutes(&self) -> i64 {
        let now = Utc::now();
        (now - self.cached_at).num_minutes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(status: u16) -> ResponseSnapshot {
        ResponseSnapshot::new(
            "https://teamgalaxy.test/".to_string(),
            status,
            vec![("Content-Type".to_string(), "text/html".to_string())],
            b"<html></html>".to_vec(),
        )
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let snap = snapshot(200);
        assert_eq!(snap.header("content-type"), Some("text/html"));
        assert_eq!(snap.header("CONTENT-TYPE"), Some("text/html"));
        assert_eq!(snap.header("x-missing"), None);
    }

    #[test]
    fn test_is_success_bounds() {
        assert!(snapshot(200).is_success());
        assert!(snapshot(299).is_success());
        assert!(!snapshot(199).is_success());
        assert!(!snapshot(404).is_success());
        assert!(!snapshot(500).is_success());
    }

    #[test]
    fn test_age_minutes_for_fresh_snapshot() {
        // Just created, should be 0 or very close to 0
        assert!(snapshot(200).age_minutes() <= 1);
    }
}
