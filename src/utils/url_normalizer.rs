//! Target URL validation and normalization.
//!
//! Candidates may arrive without a scheme (`example.com/page`); they are
//! normalized by prefixing `http://` and must then parse as a URL with a host.
//! URLs pointing back at the service's own domain are rejected so a short
//! link can never resolve to another short link on this service.

use url::Url;

/// Errors that can occur during URL validation.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum UrlValidationError {
    #[error("URL must not be empty")]
    Empty,

    #[error("Only HTTP and HTTPS protocols are allowed, got '{0}'")]
    UnsupportedScheme(String),

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("URL must contain a host")]
    MissingHost,

    #[error("URL points to this service's own domain")]
    SelfReference,
}

/// Prefixes `http://` unless the URL already starts with `http://` or `https://`.
///
/// Idempotent: applying it twice yields the same string as applying it once.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(enforce_http("example.com"), "http://example.com");
/// assert_eq!(enforce_http("https://example.com"), "https://example.com");
/// ```
pub fn enforce_http(url: &str) -> String {
    if has_http_scheme(url) {
        url.to_string()
    } else {
        format!("http://{url}")
    }
}

fn has_http_scheme(url: &str) -> bool {
    let starts_with = |prefix: &str| {
        url.get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    };
    starts_with("http://") || starts_with("https://")
}

/// Returns the explicit scheme of `input`, if the text before `://` is a scheme token.
fn explicit_scheme(input: &str) -> Option<&str> {
    let (scheme, _) = input.split_once("://")?;
    let mut chars = scheme.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some(scheme)
}

/// Authority part of a scheme-less candidate (everything before the path).
fn authority_of(input: &str) -> &str {
    input.split(['/', '?', '#']).next().unwrap_or(input)
}

/// Reduces a URL or domain to a comparable host.
///
/// Strips `http://`, `https://`, a leading `www.`, any path, user info and
/// port, then lowercases the result.
pub fn host_key(input: &str) -> String {
    let mut rest = input.trim();

    for scheme in ["http://", "https://"] {
        if rest
            .get(..scheme.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(scheme))
        {
            rest = &rest[scheme.len()..];
            break;
        }
    }

    if rest
        .get(..4)
        .is_some_and(|head| head.eq_ignore_ascii_case("www."))
    {
        rest = &rest[4..];
    }

    let authority = authority_of(rest.trim_end_matches('/'));
    let host = authority.rsplit('@').next().unwrap_or(authority);

    let host = if host.starts_with('[') {
        host.find(']').map_or(host, |end| &host[..=end])
    } else {
        host.split(':').next().unwrap_or(host)
    };

    host.trim_end_matches('.').to_ascii_lowercase()
}

/// Comparable form of a host already decoded by the URL parser.
fn canonical_host(host: &str) -> String {
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    match host.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => host,
    }
}

/// Host of `input` as a client would resolve it.
///
/// Goes through the URL parser so percent-encoded, backslash-separated or
/// tab-split hosts compare by what they decode to. Falls back to
/// [`host_key`] for input the parser rejects.
fn domain_key(input: &str) -> String {
    Url::parse(&enforce_http(input.trim()))
        .ok()
        .and_then(|url| url.host_str().map(canonical_host))
        .unwrap_or_else(|| host_key(input))
}

/// Returns true if `url` targets the service's own public domain.
pub fn is_self_reference(url: &str, own_domain: &str) -> bool {
    let own = domain_key(own_domain);
    !own.is_empty() && domain_key(url) == own
}

/// True if the URL parser would silently rewrite `input` (tabs and newlines
/// are dropped, backslashes read as `/`).
fn needs_repair(input: &str) -> bool {
    input
        .chars()
        .any(|c| c == '\\' || c.is_whitespace() || c.is_control())
}

/// Validates a candidate target URL and returns its normalized form.
///
/// # Rules
///
/// 1. Surrounding whitespace is ignored; empty input is rejected
/// 2. An explicit scheme must be `http` or `https`
/// 3. Scheme-less input may not carry user info (`mailto:a@b.com` style)
/// 4. After [`enforce_http`], the URL must parse and contain a host
/// 5. The parsed host must not be `own_domain` (see [`is_self_reference`])
/// 6. The input must not rely on the parser's repairs (tabs, newlines,
///    backslashes)
///
/// The returned string is the trimmed input with `http://` enforced; it is
/// not re-serialized, so `example.com` becomes `http://example.com`.
///
/// # Errors
///
/// Returns the [`UrlValidationError`] describing the first violated rule.
pub fn validate_url(raw: &str, own_domain: &str) -> Result<String, UrlValidationError> {
    let candidate = raw.trim();
    if candidate.is_empty() {
        return Err(UrlValidationError::Empty);
    }

    match explicit_scheme(candidate) {
        Some(scheme)
            if !scheme.eq_ignore_ascii_case("http") && !scheme.eq_ignore_ascii_case("https") =>
        {
            return Err(UrlValidationError::UnsupportedScheme(
                scheme.to_ascii_lowercase(),
            ));
        }
        Some(_) => {}
        None if authority_of(candidate).contains('@') => {
            return Err(UrlValidationError::InvalidFormat(
                "user info requires an explicit scheme".to_string(),
            ));
        }
        None => {}
    }

    let normalized = enforce_http(candidate);
    let parsed =
        Url::parse(&normalized).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    if is_self_reference(&normalized, own_domain) {
        return Err(UrlValidationError::SelfReference);
    }

    if needs_repair(candidate) {
        return Err(UrlValidationError::InvalidFormat(
            "URL must not contain whitespace, control characters or backslashes".to_string(),
        ));
    }

    Ok(normalized)
}
