//! Request-path matching against permission endpoint patterns.
//!
//! Both algorithms live behind this one module so callers can swap
//! between them via [`MatchMode`]. Literal segment comparison is
//! case-sensitive; callers lower-case both sides beforehand.

use crate::config::MatchMode;

/// Whether a request path satisfies an endpoint pattern under the
/// given mode.
pub fn endpoint_matches(path: &str, endpoint: &str, mode: MatchMode) -> bool {
    match mode {
        MatchMode::Containment => path_contains(path, endpoint),
        MatchMode::Positional => path_matches_positional(path, endpoint),
    }
}

/// Containment matching: segment counts must agree, and every literal
/// pattern segment must appear somewhere among the request's
/// segments. Parameter segments are wildcards and are not examined.
/// A pattern with no literal segment never matches.
pub fn path_contains(path: &str, endpoint: &str) -> bool {
    let path = path.split('?').next().unwrap_or_default();
    let path_segments: Vec<&str> = path.split('/').collect();
    let endpoint_segments: Vec<&str> = endpoint.split('/').collect();

    if path_segments.len() != endpoint_segments.len() {
        return false;
    }

    let mut matched = false;
    for segment in &endpoint_segments {
        if is_parameter(segment) {
            continue;
        }
        matched = path_segments.contains(segment);
        if !matched {
            break;
        }
    }

    matched
}

/// Positional matching: segment counts must agree and every literal
/// pattern segment must equal the request segment at the same index.
pub fn path_matches_positional(path: &str, endpoint: &str) -> bool {
    let path = path.split('?').next().unwrap_or_default();
    let path_segments: Vec<&str> = path.split('/').collect();
    let endpoint_segments: Vec<&str> = endpoint.split('/').collect();

    if path_segments.len() != endpoint_segments.len() {
        return false;
    }

    endpoint_segments
        .iter()
        .zip(&path_segments)
        .all(|(pattern, actual)| is_parameter(pattern) || pattern == actual)
}

/// Parameter segments carry a `:` marker or are brace-wrapped
/// (`{skillId}`); both conventions appear in stored patterns.
fn is_parameter(segment: &str) -> bool {
    segment.contains(':') || (segment.starts_with('{') && segment.ends_with('}'))
}
