use std::time::Duration;

use tracing::warn;

use almanac_client::{CollectionPublisher, PublishOutcome};
use almanac_types::{Collection, Registry};

use crate::error::{Result, SyncError};

/// Exponential-backoff retry wrapper around the publish call.
///
/// Delays are `base * 2^attempt` with no jitter. An already-public
/// conflict short-circuits to success on any attempt because the remote
/// call is idempotent. Stateless across items.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Publishes one collection, retrying transient failures.
    ///
    /// A failure on the final attempt is terminal for the item and
    /// reported as [`SyncError::PublishExhausted`].
    pub async fn publish(
        &self,
        publisher: &dyn CollectionPublisher,
        registry: Registry,
        collection: &Collection,
    ) -> Result<PublishOutcome> {
        let mut attempt = 0;
        loop {
            match publisher.publish(registry, collection).await {
                Ok(outcome) => return Ok(outcome),
                Err(error) => {
                    if attempt + 1 >= self.max_attempts {
                        return Err(SyncError::PublishExhausted {
                            database: registry.as_str().to_string(),
                            collection: collection.name.clone(),
                            attempts: self.max_attempts,
                            last_error: error,
                        });
                    }

                    let delay = self.base_delay * 2u32.pow(attempt);
                    warn!(
                        database = registry.as_str(),
                        collection = %collection.name,
                        attempt = attempt + 1,
                        max_attempts = self.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        %error,
                        "publish attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;
    use tokio::time::Instant;

    use almanac_client::ClientError;

    use super::*;

    /// Publisher that fails the first `failures` calls with a retryable
    /// status error, then returns the given outcome.
    struct FlakyPublisher {
        failures: u32,
        outcome: PublishOutcome,
        calls: AtomicU32,
    }

    impl FlakyPublisher {
        fn new(failures: u32, outcome: PublishOutcome) -> Self {
            Self {
                failures,
                outcome,
                calls: AtomicU32::new(0),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CollectionPublisher for FlakyPublisher {
        async fn publish(
            &self,
            _registry: Registry,
            _collection: &Collection,
        ) -> almanac_client::Result<PublishOutcome> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(ClientError::UnexpectedStatus {
                    status: 500,
                    url: "https://backend.example/api/v1/public-collections".to_string(),
                    body: "boom".to_string(),
                })
            } else {
                Ok(self.outcome)
            }
        }
    }

    fn collection() -> Collection {
        Collection {
            name: "pkg_1.0.0".to_string(),
            id: "abc".to_string(),
            metadata: None,
        }
    }

    #[tokio::test]
    async fn already_public_succeeds_on_first_attempt_without_retries() {
        let publisher = FlakyPublisher::new(0, PublishOutcome::AlreadyPublic);
        let policy = RetryPolicy::default();

        let outcome = policy
            .publish(&publisher, Registry::Npm, &collection())
            .await
            .unwrap();

        assert_eq!(outcome, PublishOutcome::AlreadyPublic);
        assert_eq!(publisher.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn recovers_after_a_transient_failure() {
        let publisher = FlakyPublisher::new(1, PublishOutcome::Published);
        let policy = RetryPolicy::default();

        let outcome = policy
            .publish(&publisher, Registry::Npm, &collection())
            .await
            .unwrap();

        assert_eq!(outcome, PublishOutcome::Published);
        assert_eq!(publisher.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausts_exactly_max_attempts_with_doubling_delays() {
        let publisher = FlakyPublisher::new(u32::MAX, PublishOutcome::Published);
        let policy = RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        };

        let started = Instant::now();
        let error = policy
            .publish(&publisher, Registry::Terraform, &collection())
            .await
            .unwrap_err();

        assert_eq!(publisher.calls(), 3);
        // Sleeps of 1s and 2s between the three attempts.
        assert_eq!(started.elapsed(), Duration::from_secs(3));
        match error {
            SyncError::PublishExhausted {
                database,
                collection,
                attempts,
                ..
            } => {
                assert_eq!(database, "terraform");
                assert_eq!(collection, "pkg_1.0.0");
                assert_eq!(attempts, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
