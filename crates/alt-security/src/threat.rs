//! Threat-level request filter (spec §4.5): classify an inbound request
//! and map the verdict to a pass/log/throttle/block action.

use std::net::IpAddr;

/// One of the four verdicts a request can be classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThreatLevel {
    Safe,
    Suspect,
    Dangerous,
    Malicious,
}

impl ThreatLevel {
    /// Parses an externally-sourced level name. Anything unrecognized
    /// fails open to `Safe` — a classifier bug should never lock out
    /// real users (spec §4.5).
    pub fn from_str_fail_open(s: &str) -> Self {
        match s {
            "suspect" => Self::Suspect,
            "dangerous" => Self::Dangerous,
            "malicious" => Self::Malicious,
            "safe" => Self::Safe,
            _ => Self::Safe,
        }
    }
}

/// The request features the classifier inspects. No persistence: these
/// are re-derived per request, never stored.
#[derive(Debug, Clone)]
pub struct RequestFeatures<'a> {
    pub source_ip: Option<IpAddr>,
    pub user_agent: Option<&'a str>,
    pub path: &'a str,
    /// First N bytes of the request body, as configured by
    /// `DOS_PROTECTION_BODY_INSPECT_BYTES`.
    pub body_snippet: &'a [u8],
}

const SQLI_MARKERS: &[&str] = &["union select", "' or '1'='1", "; drop table", "--"];
const PATH_TRAVERSAL_MARKERS: &[&str] = &["../", "..\\", "%2e%2e%2f"];
const KNOWN_SCANNER_AGENTS: &[&str] = &["sqlmap", "nikto", "masscan", "nmap"];

/// Deterministic heuristic classifier. Each signal escalates the verdict;
/// the final level is the worst signal observed.
pub fn classify(features: &RequestFeatures<'_>) -> ThreatLevel {
    let mut level = ThreatLevel::Safe;

    let lower_path = features.path.to_ascii_lowercase();
    if PATH_TRAVERSAL_MARKERS.iter().any(|m| lower_path.contains(m)) {
        level = escalate(level, ThreatLevel::Dangerous);
    }

    if let Some(ua) = features.user_agent {
        let lower_ua = ua.to_ascii_lowercase();
        if KNOWN_SCANNER_AGENTS.iter().any(|m| lower_ua.contains(m)) {
            level = escalate(level, ThreatLevel::Malicious);
        }
        if ua.is_empty() {
            level = escalate(level, ThreatLevel::Suspect);
        }
    } else {
        level = escalate(level, ThreatLevel::Suspect);
    }

    if let Ok(body_text) = std::str::from_utf8(features.body_snippet) {
        let lower_body = body_text.to_ascii_lowercase();
        if SQLI_MARKERS.iter().any(|m| lower_body.contains(m)) {
            level = escalate(level, ThreatLevel::Malicious);
        }
    }

    level
}

fn escalate(current: ThreatLevel, candidate: ThreatLevel) -> ThreatLevel {
    if severity(candidate) > severity(current) {
        candidate
    } else {
        current
    }
}

fn severity(level: ThreatLevel) -> u8 {
    match level {
        ThreatLevel::Safe => 0,
        ThreatLevel::Suspect => 1,
        ThreatLevel::Dangerous => 2,
        ThreatLevel::Malicious => 3,
    }
}

/// What the inbound middleware does with a given verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterAction {
    /// Admit the request.
    Pass,
    /// Admit the request, but log a warning with the offending features.
    LogAndPass,
    /// HTTP 429, body code `RATE_LIMITED`.
    TooManyRequests,
    /// HTTP 403, body code `SECURITY_VIOLATION`.
    Forbidden,
}

pub fn policy_for(level: ThreatLevel) -> FilterAction {
    match level {
        ThreatLevel::Safe => FilterAction::Pass,
        ThreatLevel::Suspect => FilterAction::LogAndPass,
        ThreatLevel::Dangerous => FilterAction::TooManyRequests,
        ThreatLevel::Malicious => FilterAction::Forbidden,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features<'a>(path: &'a str, user_agent: Option<&'a str>, body: &'a [u8]) -> RequestFeatures<'a> {
        RequestFeatures {
            source_ip: None,
            user_agent,
            path,
            body_snippet: body,
        }
    }

    #[test]
    fn ordinary_request_is_safe() {
        let f = features("/api/feed", Some("Mozilla/5.0"), b"{}");
        assert_eq!(classify(&f), ThreatLevel::Safe);
        assert_eq!(policy_for(classify(&f)), FilterAction::Pass);
    }

    #[test]
    fn missing_user_agent_is_suspect() {
        let f = features("/api/feed", None, b"{}");
        assert_eq!(classify(&f), ThreatLevel::Suspect);
        assert_eq!(policy_for(classify(&f)), FilterAction::LogAndPass);
    }

    #[test]
    fn path_traversal_is_dangerous() {
        let f = features("/api/../../etc/passwd", Some("Mozilla/5.0"), b"{}");
        assert_eq!(classify(&f), ThreatLevel::Dangerous);
        assert_eq!(policy_for(classify(&f)), FilterAction::TooManyRequests);
    }

    #[test]
    fn known_scanner_agent_is_malicious() {
        let f = features("/api/feed", Some("sqlmap/1.6"), b"{}");
        assert_eq!(classify(&f), ThreatLevel::Malicious);
        assert_eq!(policy_for(classify(&f)), FilterAction::Forbidden);
    }

    #[test]
    fn sqli_marker_in_body_is_malicious() {
        let f = features("/api/login", Some("Mozilla/5.0"), b"' or '1'='1");
        assert_eq!(classify(&f), ThreatLevel::Malicious);
    }

    #[test]
    fn worst_signal_wins() {
        // Scanner agent (malicious) alongside a missing-body (safe) signal.
        let f = features("/api/feed", Some("nikto"), b"");
        assert_eq!(classify(&f), ThreatLevel::Malicious);
    }

    #[test]
    fn unrecognized_level_name_fails_open_to_safe() {
        assert_eq!(ThreatLevel::from_str_fail_open("garbage"), ThreatLevel::Safe);
        assert_eq!(ThreatLevel::from_str_fail_open(""), ThreatLevel::Safe);
    }
}
