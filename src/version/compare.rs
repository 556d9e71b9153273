//! Lenient version parsing and ordering.
//!
//! Everything here is total: malformed input parses to `(0, 0, 0)` instead
//! of raising, so a garbled metadata file can never break a reconciliation
//! sweep. The ordering rule is asymmetric on purpose — the remote feed only
//! publishes `major.minor`-level precision, so the local tuple is truncated
//! to the remote's arity before comparing. Comparing at finer granularity
//! than the feed provides would produce false "newer" verdicts (local
//! `131.0.1.9136` vs remote `131.0` is *equal*, not behind).

use crate::constants::UNKNOWN_VERSION;

/// Parse a version string into an ordered tuple of non-negative integers.
///
/// Strips every character that is not a digit or a dot, then splits on dots.
/// Returns `(0, 0, 0)` for empty input, for anything containing the
/// `"unknown"` sentinel, and for any input whose segments do not survive
/// integer parsing. Never fails.
///
/// ```
/// use fxpm_cli::version::parse_version_tuple;
///
/// assert_eq!(parse_version_tuple("131.0.1"), vec![131, 0, 1]);
/// assert_eq!(parse_version_tuple(""), vec![0, 0, 0]);
/// assert_eq!(parse_version_tuple("unknown"), vec![0, 0, 0]);
/// ```
pub fn parse_version_tuple(version: &str) -> Vec<u64> {
    if version.is_empty() || version.contains(UNKNOWN_VERSION) {
        return vec![0, 0, 0];
    }

    let clean: String = version.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect();

    let parts: Option<Vec<u64>> =
        clean.split('.').map(|segment| segment.parse::<u64>().ok()).collect();

    match parts {
        Some(tuple) if !tuple.is_empty() => tuple,
        _ => vec![0, 0, 0],
    }
}

/// Decide whether `remote` is newer than `local`.
///
/// Returns `false` immediately when the local version is the unknown
/// sentinel or the remote string is empty — no update is ever offered on
/// missing information. Otherwise both sides are parsed and the *local*
/// tuple is truncated to the remote's component count before a
/// lexicographic comparison.
pub fn is_newer(local: &str, remote: &str) -> bool {
    if local.contains(UNKNOWN_VERSION) || remote.is_empty() {
        return false;
    }

    let local_tuple = parse_version_tuple(local);
    let remote_tuple = parse_version_tuple(remote);

    let truncated = &local_tuple[..remote_tuple.len().min(local_tuple.len())];
    remote_tuple.as_slice() > truncated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_total() {
        assert_eq!(parse_version_tuple(""), vec![0, 0, 0]);
        assert_eq!(parse_version_tuple("131.0.1"), vec![131, 0, 1]);
        assert_eq!(parse_version_tuple("unknown-ish"), vec![0, 0, 0]);
        assert_eq!(parse_version_tuple("..."), vec![0, 0, 0]);
        assert_eq!(parse_version_tuple("not a version"), vec![0, 0, 0]);
    }

    #[test]
    fn parse_strips_suffixes() {
        // Nightly-style token: the 'a' is dropped, digits around it survive
        assert_eq!(parse_version_tuple("132.0a1"), vec![132, 1]);
        assert_eq!(parse_version_tuple("v131.0"), vec![131, 0]);
    }

    #[test]
    fn truncation_law() {
        // Remote publishes major.minor only; a longer local must not lose
        assert!(!is_newer("131.0.1.9136", "131.0"));
        assert!(is_newer("131.0.1.9136", "132.0"));
    }

    #[test]
    fn unknown_local_never_updates() {
        assert!(!is_newer("unknown", "999.0"));
        assert!(!is_newer("unknown", ""));
        assert!(!is_newer("Installed (unknown)", "131.0"));
    }

    #[test]
    fn empty_remote_never_updates() {
        assert!(!is_newer("131.0", ""));
    }

    #[test]
    fn plain_ordering() {
        assert!(is_newer("130.0", "131.0"));
        assert!(!is_newer("131.0", "131.0"));
        assert!(!is_newer("131.0", "130.9"));
    }
}
