//! Long URL validation.
//!
//! Rules are applied in order and the first failing rule wins:
//! empty, malformed, scheme, host, length, scheme-only.

use crate::error::ValidationError;
use url::{ParseError, Url};

/// Maximum accepted length of a long URL, in characters.
pub const MAX_URL_LENGTH: usize = 2048;

const ALLOWED_SCHEMES: [&str; 2] = ["http", "https"];

/// Checks that `candidate` is an absolute `http`/`https` URL with a host.
pub fn validate_url(candidate: &str) -> Result<(), ValidationError> {
    if candidate.is_empty() {
        return Err(ValidationError::Empty);
    }

    // the parser silently strips or drops these; reject them as written
    if candidate
        .chars()
        .any(|c| c.is_ascii_whitespace() || c.is_control())
    {
        return Err(ValidationError::Malformed);
    }

    let parsed = match Url::parse(candidate) {
        Ok(parsed) => parsed,
        // `http://` and friends parse up to the authority and then fail on
        // the missing host; report those by the scheme rule first.
        Err(ParseError::EmptyHost) => {
            return match raw_scheme(candidate) {
                Some(scheme) if is_allowed_scheme(&scheme) => Err(ValidationError::MissingHost),
                _ => Err(ValidationError::UnsupportedScheme),
            };
        }
        Err(_) => return Err(ValidationError::Malformed),
    };

    if !is_allowed_scheme(parsed.scheme()) {
        return Err(ValidationError::UnsupportedScheme);
    }

    // `http:x.io` and `http:///x.io` get an authority from the parser;
    // the raw text must carry one itself
    let has_raw_host = raw_authority(candidate).is_some_and(|authority| !authority.is_empty());
    if !has_raw_host || parsed.host_str().map_or(true, str::is_empty) {
        return Err(ValidationError::MissingHost);
    }

    if candidate.chars().count() > MAX_URL_LENGTH {
        return Err(ValidationError::TooLong);
    }

    // Unreachable once the host rule passed; kept so the rule order stays
    // complete.
    let remainder = candidate
        .strip_prefix("https://")
        .or_else(|| candidate.strip_prefix("http://"))
        .unwrap_or(candidate);
    if remainder.trim().is_empty() {
        return Err(ValidationError::SchemeOnly);
    }

    Ok(())
}

fn is_allowed_scheme(scheme: &str) -> bool {
    ALLOWED_SCHEMES.contains(&scheme)
}

/// Text between `scheme://` and the first `/`, `?` or `#`. `None` when the
/// candidate has no `//` right after the scheme.
fn raw_authority(candidate: &str) -> Option<&str> {
    let (_, rest) = candidate.split_once(':')?;
    let rest = rest.strip_prefix("//")?;
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    Some(&rest[..end])
}

/// Scheme as written by the caller, lowercased the same way the parser does.
fn raw_scheme(candidate: &str) -> Option<String> {
    let (scheme, _) = candidate.split_once(':')?;
    let mut chars = scheme.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then(|| scheme.to_ascii_lowercase())
}
