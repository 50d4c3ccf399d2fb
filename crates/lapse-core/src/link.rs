use crate::error::{CreateError, CreateResult};
use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt::Display;
use std::time::Duration;

/// The short identifier of a link, e.g. `3DZHeG`.
///
/// Ids are only unique among the links currently stored in a registry; an id
/// may be handed out again once its link is gone.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkId(String);

impl LinkId {
    /// Wraps a string as an id without checking its shape.
    ///
    /// Generators are the intended callers; lookups take `&str` directly.
    pub fn new_unchecked(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Renders the short reference `<base><id>`.
    ///
    /// The base is used verbatim, so it must carry its own trailing
    /// separator (`http://clck.ru/`).
    pub fn to_url(&self, base: &str) -> String {
        format!("{}{}", base, self.0)
    }
}

impl Display for LinkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for LinkId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for LinkId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Parameters for creating a link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSpec {
    /// The resource the link points to. Opaque to the registry.
    pub target: String,
    /// Who may delete the link.
    pub owner: String,
    /// How long the link stays usable after creation. Must be positive.
    pub ttl: Duration,
    /// How many successful resolutions the link allows. `0` is allowed and
    /// yields a link that is exhausted from the start.
    pub max_uses: u32,
}

impl LinkSpec {
    pub fn new(
        target: impl Into<String>,
        owner: impl Into<String>,
        ttl: Duration,
        max_uses: u32,
    ) -> Self {
        Self {
            target: target.into(),
            owner: owner.into(),
            ttl,
            max_uses,
        }
    }

    /// Checks the ttl and returns it as a signed duration.
    pub(crate) fn validated_ttl(&self) -> CreateResult<SignedDuration> {
        if self.ttl.is_zero() {
            return Err(CreateError::InvalidInput(
                "ttl must be a positive duration".to_string(),
            ));
        }
        SignedDuration::try_from(self.ttl)
            .map_err(|e| CreateError::InvalidInput(format!("ttl out of range: {}", e)))
    }

    /// Rejects a request that could never become a record.
    pub fn validate(&self, created_at: Timestamp) -> CreateResult<()> {
        let ttl = self.validated_ttl()?;
        created_at.checked_add(ttl).map_err(|e| {
            CreateError::InvalidInput(format!("ttl overflows the timestamp range: {}", e))
        })?;
        Ok(())
    }
}

/// A point-in-time snapshot of a stored link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub id: LinkId,
    pub target: String,
    pub owner: String,
    pub created_at: Timestamp,
    pub ttl: Duration,
    /// `created_at + ttl`, fixed at construction.
    pub expires_at: Timestamp,
    pub max_uses: u32,
    pub use_count: u32,
}

impl LinkRecord {
    /// Builds a fresh record with no uses.
    ///
    /// Fails with [`CreateError::InvalidInput`] when the ttl is zero or when
    /// `created_at + ttl` falls outside the representable range.
    pub fn new(id: LinkId, spec: LinkSpec, created_at: Timestamp) -> CreateResult<Self> {
        let ttl = spec.validated_ttl()?;
        let expires_at = created_at.checked_add(ttl).map_err(|e| {
            CreateError::InvalidInput(format!("ttl overflows the timestamp range: {}", e))
        })?;

        Ok(Self {
            id,
            target: spec.target,
            owner: spec.owner,
            created_at,
            ttl: spec.ttl,
            expires_at,
            max_uses: spec.max_uses,
            use_count: 0,
        })
    }

    /// Uses left before the link is exhausted.
    pub fn remaining_uses(&self) -> u32 {
        self.max_uses.saturating_sub(self.use_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn epoch() -> Timestamp {
        Timestamp::from_second(1_700_000_000).unwrap()
    }

    fn spec(ttl: Duration, max_uses: u32) -> LinkSpec {
        LinkSpec::new("https://example.com/page", "user-1", ttl, max_uses)
    }

    #[test]
    fn new_record_starts_unused() {
        let record = LinkRecord::new(
            LinkId::new_unchecked("abc123"),
            spec(Duration::from_secs(15), 2),
            epoch(),
        )
        .unwrap();

        assert_eq!(record.use_count, 0);
        assert_eq!(record.remaining_uses(), 2);
        assert_eq!(record.created_at, epoch());
        assert_eq!(
            record.expires_at,
            Timestamp::from_second(1_700_000_015).unwrap()
        );
    }

    #[test]
    fn zero_ttl_is_rejected() {
        let err = LinkRecord::new(
            LinkId::new_unchecked("abc123"),
            spec(Duration::ZERO, 2),
            epoch(),
        )
        .unwrap_err();
        assert!(matches!(err, CreateError::InvalidInput(_)));
    }

    #[test]
    fn overflowing_ttl_is_rejected() {
        let huge = spec(Duration::from_secs(u64::MAX), 1);
        assert!(matches!(
            huge.validate(epoch()),
            Err(CreateError::InvalidInput(_))
        ));

        let far = spec(Duration::from_secs(1_000_000_000_000), 1);
        assert!(matches!(
            far.validate(epoch()),
            Err(CreateError::InvalidInput(_))
        ));
    }

    #[test]
    fn zero_max_uses_is_accepted() {
        let record = LinkRecord::new(
            LinkId::new_unchecked("abc123"),
            spec(Duration::from_secs(1), 0),
            epoch(),
        )
        .unwrap();
        assert_eq!(record.remaining_uses(), 0);
    }

    #[test]
    fn to_url_appends_id() {
        let id = LinkId::new_unchecked("3DZHeG");
        assert_eq!(id.to_url("http://clck.ru/"), "http://clck.ru/3DZHeG");
        assert_eq!(id.to_string(), "3DZHeG");
    }

    #[test]
    fn id_serializes_as_plain_string() {
        let id = LinkId::new_unchecked("3DZHeG");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"3DZHeG\"");
    }
}
