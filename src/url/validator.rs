use crate::{UrlError, UrlResult};
use url::Url;

/// Schemes a seed may carry. An absent scheme is also accepted.
const ALLOWED_SCHEMES: &[&str] = &["http", "https"];

/// Returns true if `input` is an acceptable task seed
///
/// This is the total, side-effect-free form of [`check_seed`]: any input that
/// cannot be parsed simply yields `false`.
///
/// # Examples
///
/// ```
/// use crawl_watch::url::is_valid_seed;
///
/// assert!(is_valid_seed("https://example.com"));
/// assert!(is_valid_seed("example.com/about?x=1#top"));
/// assert!(is_valid_seed("http://192.168.0.1:8080/"));
///
/// assert!(!is_valid_seed("not a url"));
/// assert!(!is_valid_seed("ftp://example.com"));
/// ```
pub fn is_valid_seed(input: &str) -> bool {
    check_seed(input).is_ok()
}

/// Checks a seed URL and reports why it was rejected
///
/// # Validation Steps
///
/// 1. Trim surrounding whitespace; reject if empty
/// 2. Reject inner whitespace and control characters
/// 3. Scheme, if present, must be `http` or `https` (case-insensitive)
/// 4. Authority must be `host[:port]` with no user info
/// 5. Host is either a dotted-quad IPv4 address or dot-separated labels
///    ending in an alphabetic top-level label
/// 6. Port, if present, must be in 1..=65535
/// 7. The absolute form must parse as a URL
pub fn check_seed(input: &str) -> UrlResult<()> {
    let input = input.trim();
    if input.is_empty() {
        return Err(UrlError::Empty);
    }

    if input.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(UrlError::Malformed(
            "contains whitespace or control characters".to_string(),
        ));
    }

    let rest = match split_scheme(input) {
        Some((scheme, rest)) => {
            let scheme = scheme.to_ascii_lowercase();
            if !ALLOWED_SCHEMES.contains(&scheme.as_str()) {
                return Err(UrlError::InvalidScheme(scheme));
            }
            rest
        }
        None => input,
    };

    let authority_end = rest.find(&['/', '?', '#'][..]).unwrap_or(rest.len());
    let authority = &rest[..authority_end];

    if authority.contains('@') {
        return Err(UrlError::Malformed("user info is not allowed".to_string()));
    }

    if authority.starts_with('[') {
        return Err(UrlError::InvalidHost(authority.to_string()));
    }

    let (host, port) = match authority.split_once(':') {
        Some((host, port)) => (host, Some(port)),
        None => (authority, None),
    };

    if host.is_empty() {
        return Err(UrlError::MissingDomain);
    }

    validate_host(host)?;

    if let Some(port) = port {
        validate_port(port)?;
    }

    absolute_url(input).map(|_| ())
}

/// Builds the absolute URL for a seed, prefixing `http://` when no scheme was given
pub(crate) fn absolute_url(input: &str) -> UrlResult<Url> {
    let input = input.trim();
    let candidate = if split_scheme(input).is_some() {
        input.to_string()
    } else {
        format!("http://{}", input)
    };

    Url::parse(&candidate).map_err(|e| UrlError::Malformed(e.to_string()))
}

/// Splits `scheme://rest` when the prefix looks like a URL scheme
///
/// A "://" that appears after a path or query character belongs to the
/// remainder (for instance `example.com/?next=http://other.com`).
fn split_scheme(input: &str) -> Option<(&str, &str)> {
    let (scheme, rest) = input.split_once("://")?;

    let mut chars = scheme.chars();
    let first_is_alpha = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    let tail_ok = chars.all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.');

    if first_is_alpha && tail_ok {
        Some((scheme, rest))
    } else {
        None
    }
}

fn validate_host(host: &str) -> UrlResult<()> {
    if host.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return validate_ipv4(host);
    }

    let labels: Vec<&str> = host.split('.').collect();

    // Must contain at least one dot (e.g., example.com, not just "example")
    if labels.len() < 2 {
        return Err(UrlError::InvalidHost(host.to_string()));
    }

    for label in &labels {
        if label.is_empty() || label.len() > 63 {
            return Err(UrlError::InvalidHost(host.to_string()));
        }

        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(UrlError::InvalidHost(host.to_string()));
        }

        if label.starts_with('-') || label.ends_with('-') {
            return Err(UrlError::InvalidHost(host.to_string()));
        }
    }

    let tld = labels[labels.len() - 1];
    if tld.len() < 2 || !tld.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(UrlError::InvalidHost(host.to_string()));
    }

    Ok(())
}

fn validate_ipv4(host: &str) -> UrlResult<()> {
    let octets: Vec<&str> = host.split('.').collect();
    if octets.len() != 4 {
        return Err(UrlError::InvalidHost(host.to_string()));
    }

    for octet in octets {
        if octet.is_empty() || octet.len() > 3 {
            return Err(UrlError::InvalidHost(host.to_string()));
        }
        match octet.parse::<u16>() {
            Ok(value) if value <= 255 => {}
            _ => return Err(UrlError::InvalidHost(host.to_string())),
        }
    }

    Ok(())
}

fn validate_port(port: &str) -> UrlResult<()> {
    if port.is_empty() || !port.chars().all(|c| c.is_ascii_digit()) {
        return Err(UrlError::InvalidPort(port.to_string()));
    }

    match port.parse::<u16>() {
        Ok(value) if value > 0 => Ok(()),
        _ => Err(UrlError::InvalidPort(port.to_string())),
    }
}
