use crate::link::LinkRecord;
use jiff::Timestamp;

/// Decides whether a link may still be followed.
///
/// Both the resolve path and the sweep path consult these predicates, so
/// a link is never "expired" to one and "alive" to the other.
#[derive(Debug, Clone, Copy, Default)]
pub struct LifecyclePolicy;

impl LifecyclePolicy {
    /// A link is expired strictly after `created_at + ttl`.
    pub fn is_expired(record: &LinkRecord, now: Timestamp) -> bool {
        Self::is_expired_at(record.expires_at, now)
    }

    /// The same check on a bare deadline, for callers holding only the
    /// deadline of a stored link.
    pub fn is_expired_at(expires_at: Timestamp, now: Timestamp) -> bool {
        now > expires_at
    }

    pub fn is_limit_reached(record: &LinkRecord) -> bool {
        Self::is_limit_reached_at(record.use_count, record.max_uses)
    }

    pub fn is_limit_reached_at(use_count: u32, max_uses: u32) -> bool {
        use_count >= max_uses
    }
}
