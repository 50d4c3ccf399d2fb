use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use lapse_core::error::{CreateResult, ResolveResult};
use lapse_core::{
    Clock, CreateError, LifecyclePolicy, LinkId, LinkRecord, LinkSpec, ResolveError, SystemClock,
};
use lapse_generator::{Generator, RandomGenerator};
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::{debug, error, info, trace, warn};
use typed_builder::TypedBuilder;

/// Tunables for a [`LinkRegistry`].
#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct RegistrySettings {
    /// How many candidate ids `create` tries before giving up.
    #[builder(default = 8)]
    pub max_generation_attempts: usize,
    /// Number of links the store can hold before reallocating.
    #[builder(default = 0)]
    pub initial_capacity: usize,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// A stored link.
///
/// Everything except the use counter is frozen at creation. The counter is
/// only bumped through [`Slot::try_consume`], which never lets it pass
/// `max_uses`.
#[derive(Debug)]
struct Slot {
    record: LinkRecord,
    uses: AtomicU32,
}

impl Slot {
    fn new(record: LinkRecord) -> Self {
        let uses = AtomicU32::new(record.use_count);
        Self { record, uses }
    }

    fn is_expired(&self, now: jiff::Timestamp) -> bool {
        LifecyclePolicy::is_expired_at(self.record.expires_at, now)
    }

    /// Claims one use. Returns the new use count, or `None` if the link is
    /// already exhausted.
    fn try_consume(&self) -> Option<u32> {
        let max_uses = self.record.max_uses;
        self.uses
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |count| {
                (!LifecyclePolicy::is_limit_reached_at(count, max_uses)).then(|| count + 1)
            })
            .ok()
            .map(|previous| previous + 1)
    }

    fn snapshot(&self) -> LinkRecord {
        LinkRecord {
            use_count: self.uses.load(Ordering::Acquire),
            ..self.record.clone()
        }
    }
}

/// A concurrent registry of expiring, use-limited links.
///
/// Links live in a [`DashMap`], so inserts and removals lock one shard at
/// a time. Resolutions only take the shard's read lock and count uses
/// with a compare-and-increment on the link's own counter; removal needs
/// the write lock and therefore never interleaves with an in-flight
/// increment.
///
/// Share it between threads or tasks behind an `Arc`.
pub struct LinkRegistry<G = RandomGenerator, C = SystemClock> {
    storage: DashMap<LinkId, Slot>,
    generator: G,
    clock: C,
    settings: RegistrySettings,
}

impl LinkRegistry<RandomGenerator, SystemClock> {
    /// Creates a registry with random six-character ids and the system clock.
    pub fn new() -> Self {
        Self::with_parts(
            RandomGenerator::new(),
            SystemClock,
            RegistrySettings::default(),
        )
    }
}

impl Default for LinkRegistry<RandomGenerator, SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: Generator, C: Clock> LinkRegistry<G, C> {
    pub fn with_parts(generator: G, clock: C, settings: RegistrySettings) -> Self {
        Self {
            storage: DashMap::with_capacity(settings.initial_capacity),
            generator,
            clock,
            settings,
        }
    }

    /// Stores a new link under a freshly generated id.
    ///
    /// The request is validated before any id is drawn, so a rejected request
    /// leaves the registry untouched. A candidate that collides with any
    /// stored link, expired or not, is discarded and a new one is drawn.
    pub fn create(&self, spec: LinkSpec) -> CreateResult<LinkRecord> {
        let created_at = self.clock.now();
        spec.validate(created_at)?;

        let attempts = self.settings.max_generation_attempts.max(1);
        for attempt in 1..=attempts {
            let candidate: LinkId = self.generator.generate().into();

            match self.storage.entry(candidate) {
                Entry::Vacant(vacant) => {
                    let record = LinkRecord::new(vacant.key().clone(), spec, created_at)?;
                    vacant.insert(Slot::new(record.clone()));
                    info!(
                        id = %record.id,
                        owner = %record.owner,
                        max_uses = record.max_uses,
                        expires_at = %record.expires_at,
                        "link created"
                    );
                    return Ok(record);
                }
                Entry::Occupied(occupied) => {
                    let id = occupied.key().clone();
                    drop(occupied);
                    warn!(id = %id, attempt, "link id collision");
                }
            }
        }

        error!(attempts, "link id space exhausted");
        Err(CreateError::GenerationExhausted { attempts })
    }

    /// Returns a snapshot of the link without touching its lifecycle.
    ///
    /// Expired links are still returned until something evicts them.
    pub fn get(&self, id: &str) -> Option<LinkRecord> {
        trace!(id, "looking up link");
        self.storage.get(id).map(|slot| slot.snapshot())
    }

    /// Consumes one use of the link and returns its target.
    ///
    /// An expired link is removed as a side effect and reported as
    /// [`ResolveError::Expired`]. An exhausted link is left in place.
    pub fn resolve(&self, id: &str) -> ResolveResult<String> {
        let now = self.clock.now();

        let Some(slot) = self.storage.get(id) else {
            trace!(id, "link not found");
            return Err(ResolveError::NotFound);
        };

        if slot.is_expired(now) {
            drop(slot);
            // Re-checked under the write lock: the id may have been handed
            // to a new link since the read guard was released.
            self.storage.remove_if(id, |_, slot| slot.is_expired(now));
            debug!(id, "link expired and was removed");
            return Err(ResolveError::Expired);
        }

        match slot.try_consume() {
            Some(use_count) => {
                trace!(id, use_count, max_uses = slot.record.max_uses, "link resolved");
                Ok(slot.record.target.clone())
            }
            None => {
                debug!(id, max_uses = slot.record.max_uses, "link use limit reached");
                Err(ResolveError::LimitReached)
            }
        }
    }

    /// Removes the link if `owner` created it.
    ///
    /// Returns `false` both when the link does not exist and when it belongs
    /// to someone else, so a stranger learns nothing about which ids exist.
    pub fn delete(&self, id: &str, owner: &str) -> bool {
        let removed = self
            .storage
            .remove_if(id, |_, slot| slot.record.owner == owner)
            .is_some();

        if removed {
            info!(id, owner, "link deleted");
        } else {
            debug!(id, owner, "link not deleted");
        }
        removed
    }

    /// Evicts every link past its ttl, whoever owns it and however many
    /// uses it has left. Returns how many links were removed.
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();
        let mut removed = 0;

        self.storage.retain(|_, slot| {
            let expired = slot.is_expired(now);
            if expired {
                removed += 1;
            }
            !expired
        });

        if removed > 0 {
            debug!(removed, "swept expired links");
        }
        removed
    }

    /// Number of stored links, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}
