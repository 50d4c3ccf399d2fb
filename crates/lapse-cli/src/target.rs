use thiserror::Error;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetError {
    #[error("url is empty")]
    Empty,
    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),
    #[error("url has no host")]
    MissingHost,
    #[error("malformed url: {0}")]
    Malformed(String),
}

/// Checks that `target` is an absolute `http` or `https` URL with a host.
///
/// The registry treats targets as opaque, so this runs before a link is
/// created.
pub fn validate_target(target: &str) -> Result<(), TargetError> {
    let target = target.trim();
    if target.is_empty() {
        return Err(TargetError::Empty);
    }

    let url = Url::parse(target).map_err(|e| TargetError::Malformed(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(TargetError::UnsupportedScheme(other.to_string())),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(TargetError::MissingHost);
    }

    Ok(())
}

pub fn is_valid_target(target: &str) -> bool {
    validate_target(target).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https() {
        assert!(is_valid_target("https://example.com/page"));
        assert!(is_valid_target("http://example.com"));
        assert!(is_valid_target("HTTPS://Example.com/a?b=c#d"));
        assert!(is_valid_target("http://127.0.0.1:8080/"));
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(validate_target("   "), Err(TargetError::Empty));
    }

    #[test]
    fn rejects_relative_and_garbage() {
        assert!(matches!(
            validate_target("example.com/page"),
            Err(TargetError::Malformed(_))
        ));
        assert!(!is_valid_target("not a url"));
    }

    #[test]
    fn rejects_other_schemes() {
        assert_eq!(
            validate_target("ftp://example.com"),
            Err(TargetError::UnsupportedScheme("ftp".to_string()))
        );
        assert!(!is_valid_target("javascript:alert(1)"));
    }
}
