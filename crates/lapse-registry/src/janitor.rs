use crate::registry::LinkRegistry;
use lapse_core::Clock;
use lapse_generator::Generator;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Shortest interval a janitor accepts; shorter requests are rounded up.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Longest interval a janitor accepts; longer requests are rounded down.
pub const MAX_INTERVAL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

fn effective_interval(requested: Duration) -> Duration {
    requested.clamp(MIN_INTERVAL, MAX_INTERVAL)
}

/// A background task that sweeps a registry on a fixed interval.
///
/// The first sweep runs one interval after spawning. The task stops when
/// [`Janitor::shutdown`] is awaited or the handle is dropped.
#[derive(Debug)]
pub struct Janitor {
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Janitor {
    /// Spawns the sweep loop on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn spawn<G, C>(registry: Arc<LinkRegistry<G, C>>, interval: Duration) -> Self
    where
        G: Generator,
        C: Clock + 'static,
    {
        let interval = effective_interval(interval);
        let (shutdown, mut stop) = oneshot::channel();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!(interval = ?interval, "janitor started");

            loop {
                tokio::select! {
                    _ = &mut stop => break,
                    _ = ticker.tick() => {
                        let removed = registry.sweep();
                        if removed > 0 {
                            debug!(removed, remaining = registry.len(), "janitor sweep");
                        }
                    }
                }
            }

            info!("janitor stopped");
        });

        Self {
            shutdown: Some(shutdown),
            handle: Some(handle),
        }
    }

    /// Stops the sweep loop and waits for it to exit.
    pub async fn shutdown(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                warn!(error = %e, "janitor task did not exit cleanly");
            }
        }
    }
}

impl Drop for Janitor {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RegistrySettings;
    use jiff::Timestamp;
    use lapse_core::{LinkSpec, ManualClock};
    use lapse_generator::SeqGenerator;

    fn setup() -> (Arc<LinkRegistry<SeqGenerator, ManualClock>>, ManualClock) {
        let clock = ManualClock::new(Timestamp::from_second(1_700_000_000).unwrap());
        let registry = LinkRegistry::with_parts(
            SeqGenerator::with_prefix("lk"),
            clock.clone(),
            RegistrySettings::default(),
        );
        (Arc::new(registry), clock)
    }

    fn spec(ttl: Duration) -> LinkSpec {
        LinkSpec::new("https://example.com", "user-1", ttl, 1)
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn evicts_expired_links_in_background() {
        let (registry, clock) = setup();
        let short = registry.create(spec(Duration::from_secs(1))).unwrap();
        let long = registry.create(spec(Duration::from_secs(3600))).unwrap();

        let janitor = Janitor::spawn(Arc::clone(&registry), Duration::from_millis(10));
        clock.advance(Duration::from_secs(2));

        awaitility::at_most(Duration::from_secs(5))
            .poll_interval(Duration::from_millis(20))
            .until_async(|| async { registry.len() == 1 })
            .await;

        assert!(registry.get(short.id.as_str()).is_none());
        assert!(registry.get(long.id.as_str()).is_some());

        janitor.shutdown().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn stops_after_shutdown() {
        let (registry, clock) = setup();

        let janitor = Janitor::spawn(Arc::clone(&registry), Duration::from_millis(10));
        janitor.shutdown().await;

        let link = registry.create(spec(Duration::from_secs(1))).unwrap();
        clock.advance(Duration::from_secs(2));
        tokio::time::sleep(Duration::from_millis(100)).await;

        // nothing swept it
        assert!(registry.get(link.id.as_str()).is_some());
    }

    #[test]
    fn interval_is_clamped() {
        assert_eq!(effective_interval(Duration::ZERO), MIN_INTERVAL);
        assert_eq!(effective_interval(Duration::MAX), MAX_INTERVAL);
        assert_eq!(
            effective_interval(Duration::from_secs(5)),
            Duration::from_secs(5)
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn huge_interval_starts_and_stops() {
        let (registry, _clock) = setup();
        let janitor = Janitor::spawn(Arc::clone(&registry), Duration::MAX);

        let handle = janitor.handle.as_ref().unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!handle.is_finished());

        janitor.shutdown().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn zero_interval_is_rounded_up() {
        let (registry, clock) = setup();
        registry.create(spec(Duration::from_secs(1))).unwrap();
        clock.advance(Duration::from_secs(2));

        let janitor = Janitor::spawn(Arc::clone(&registry), Duration::ZERO);

        awaitility::at_most(Duration::from_secs(5))
            .poll_interval(Duration::from_millis(20))
            .until_async(|| async { registry.is_empty() })
            .await;

        janitor.shutdown().await;
    }
}
