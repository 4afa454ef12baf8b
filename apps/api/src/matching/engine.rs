//! Match engine: candidate deck construction and the swipe operation.
//!
//! Per (user, listing) the lifecycle is `unseen -> swiped-left` or
//! `unseen -> swiped-right -> application:pending`. There is no way back:
//! once a swipe is committed the listing never reappears in that user's deck.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::gate::SwipeGate;
use crate::matching::store::{MatchStore, SwipeRecord};
use crate::models::job::JobWithCompany;
use crate::models::swipe::SwipeDirection;

#[derive(Debug, Clone, Serialize)]
pub struct Deck {
    pub jobs: Vec<JobWithCompany>,
    pub total: usize,
    /// No listings left to swipe on.
    pub exhausted: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Notification {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SwipeOutcome {
    #[serde(flatten)]
    pub record: SwipeRecord,
    pub notification: Option<Notification>,
}

pub struct MatchEngine {
    store: Arc<dyn MatchStore>,
    gate: SwipeGate,
}

impl MatchEngine {
    pub fn new(store: Arc<dyn MatchStore>) -> Self {
        Self {
            store,
            gate: SwipeGate::default(),
        }
    }

    /// Recomputes the user's deck from scratch: every active listing they
    /// have not swiped on, newest first.
    pub async fn build_deck(&self, user_id: Uuid) -> Result<Deck, AppError> {
        let swiped = self.store.swiped_job_ids(user_id).await?;
        let jobs = self.store.active_listings_excluding(&swiped).await?;
        let total = jobs.len();

        Ok(Deck {
            jobs,
            total,
            exhausted: total == 0,
        })
    }

    pub async fn swipe(
        &self,
        user_id: Uuid,
        job_id: Uuid,
        direction: SwipeDirection,
    ) -> Result<SwipeOutcome, AppError> {
        let _permit = self.gate.try_acquire(user_id).ok_or_else(|| {
            AppError::Conflict("A swipe is already being processed".to_string())
        })?;

        let listing = self
            .store
            .find_listing(job_id)
            .await?
            .filter(|job| job.is_active)
            .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

        let record = match self.store.record_swipe(user_id, listing.id, direction).await {
            Ok(record) => record,
            Err(e) => {
                warn!("Error recording swipe by {user_id} on {job_id}: {e}");
                return Err(e);
            }
        };

        info!("User {user_id} swiped {direction} on job {job_id}");

        let notification = record.application.as_ref().map(|_| Notification {
            title: "Application submitted!".to_string(),
            description: "Your profile has been sent to the company.".to_string(),
        });

        Ok(SwipeOutcome {
            record,
            notification,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;
    use tokio::sync::Notify;

    use super::*;
    use crate::models::application::Application;
    use crate::models::job::JobListing;
    use crate::models::swipe::Swipe;
    use crate::test_support::{company, listing};

    #[derive(Default)]
    struct MemoryMatchStore {
        listings: Vec<JobWithCompany>,
        swipes: Mutex<Vec<Swipe>>,
        applications: Mutex<Vec<Application>>,
        write_attempts: AtomicUsize,
        /// When set, `record_swipe` signals `entered` then waits for `release`.
        hold: Option<(Arc<Notify>, Arc<Notify>)>,
        fail_writes: bool,
    }

    impl MemoryMatchStore {
        fn with(listings: Vec<JobWithCompany>) -> Self {
            Self {
                listings,
                ..Self::default()
            }
        }

        fn applications_for(&self, user_id: Uuid, job_id: Uuid) -> Vec<Application> {
            self.applications
                .lock()
                .unwrap()
                .iter()
                .filter(|a| a.user_id == user_id && a.job_id == job_id)
                .cloned()
                .collect()
        }

        fn seed_swipe(&self, user_id: Uuid, job_id: Uuid) {
            self.swipes.lock().unwrap().push(Swipe {
                id: Uuid::new_v4(),
                created_at: Utc::now(),
                user_id,
                job_id,
                direction: "left".into(),
            });
        }
    }

    #[async_trait]
    impl MatchStore for MemoryMatchStore {
        async fn swiped_job_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, AppError> {
            Ok(self
                .swipes
                .lock()
                .unwrap()
                .iter()
                .filter(|s| s.user_id == user_id)
                .map(|s| s.job_id)
                .collect())
        }

        async fn active_listings_excluding(
            &self,
            excluded: &[Uuid],
        ) -> Result<Vec<JobWithCompany>, AppError> {
            let mut jobs: Vec<_> = self
                .listings
                .iter()
                .filter(|l| l.job.is_active && !excluded.contains(&l.job.id))
                .cloned()
                .collect();
            jobs.sort_by(|a, b| b.job.created_at.cmp(&a.job.created_at));
            Ok(jobs)
        }

        async fn find_listing(&self, job_id: Uuid) -> Result<Option<JobListing>, AppError> {
            Ok(self
                .listings
                .iter()
                .find(|l| l.job.id == job_id)
                .map(|l| l.job.clone()))
        }

        async fn record_swipe(
            &self,
            user_id: Uuid,
            job_id: Uuid,
            direction: SwipeDirection,
        ) -> Result<SwipeRecord, AppError> {
            self.write_attempts.fetch_add(1, Ordering::SeqCst);
            if let Some((entered, release)) = &self.hold {
                entered.notify_one();
                release.notified().await;
            }
            if self.fail_writes {
                return Err(AppError::Internal(anyhow::anyhow!("insert failed")));
            }

            let mut swipes = self.swipes.lock().unwrap();
            if swipes.iter().any(|s| s.user_id == user_id && s.job_id == job_id) {
                return Err(AppError::Conflict("already swiped".into()));
            }
            let swipe = Swipe {
                id: Uuid::new_v4(),
                created_at: Utc::now(),
                user_id,
                job_id,
                direction: direction.as_str().into(),
            };
            swipes.push(swipe.clone());

            let application = (direction == SwipeDirection::Right).then(|| Application {
                id: Uuid::new_v4(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
                job_id,
                user_id,
                cover_letter: None,
                status: "pending".into(),
                notes: None,
            });
            if let Some(app) = &application {
                self.applications.lock().unwrap().push(app.clone());
            }

            Ok(SwipeRecord { swipe, application })
        }
    }

    #[tokio::test]
    async fn test_deck_excludes_swiped_and_inactive() {
        let acme = company("Acme", None);
        let job_a = listing(&acme, "A", true, 1);
        let job_b = listing(&acme, "B", true, 2);
        let job_c = listing(&acme, "C", false, 3);
        let user = Uuid::new_v4();

        let store = MemoryMatchStore::with(vec![job_a.clone(), job_b.clone(), job_c]);
        store.seed_swipe(user, job_a.job.id);
        let engine = MatchEngine::new(Arc::new(store));

        let deck = engine.build_deck(user).await.unwrap();
        let ids: Vec<_> = deck.jobs.iter().map(|j| j.job.id).collect();
        assert_eq!(ids, vec![job_b.job.id]);
        assert!(!deck.exhausted);
    }

    #[tokio::test]
    async fn test_deck_is_newest_first() {
        let acme = company("Acme", None);
        let older = listing(&acme, "Older", true, 1);
        let newer = listing(&acme, "Newer", true, 60);
        let engine = MatchEngine::new(Arc::new(MemoryMatchStore::with(vec![
            older.clone(),
            newer.clone(),
        ])));

        let deck = engine.build_deck(Uuid::new_v4()).await.unwrap();
        let titles: Vec<_> = deck.jobs.iter().map(|j| j.job.title.as_str()).collect();
        assert_eq!(titles, vec!["Newer", "Older"]);
    }

    #[tokio::test]
    async fn test_swiped_listing_never_returns() {
        let acme = company("Acme", None);
        let job = listing(&acme, "Backend", true, 1);
        let engine = MatchEngine::new(Arc::new(MemoryMatchStore::with(vec![job.clone()])));
        let user = Uuid::new_v4();

        engine
            .swipe(user, job.job.id, SwipeDirection::Left)
            .await
            .unwrap();

        let deck = engine.build_deck(user).await.unwrap();
        assert!(deck.jobs.is_empty());
        assert!(deck.exhausted);

        // Another user still sees it.
        assert_eq!(engine.build_deck(Uuid::new_v4()).await.unwrap().total, 1);
    }

    #[tokio::test]
    async fn test_right_swipe_creates_one_pending_application() {
        let acme = company("Acme", None);
        let job = listing(&acme, "Backend", true, 1);
        let store = Arc::new(MemoryMatchStore::with(vec![job.clone()]));
        let engine = MatchEngine::new(store.clone());
        let user = Uuid::new_v4();

        let outcome = engine
            .swipe(user, job.job.id, SwipeDirection::Right)
            .await
            .unwrap();
        assert_eq!(outcome.record.swipe.direction, "right");
        assert_eq!(
            outcome.notification.map(|n| n.title),
            Some("Application submitted!".to_string())
        );

        let apps = store.applications_for(user, job.job.id);
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].status, "pending");

        // Swiping again is refused and writes nothing new.
        let again = engine.swipe(user, job.job.id, SwipeDirection::Right).await;
        assert!(matches!(again, Err(AppError::Conflict(_))));
        assert_eq!(store.applications_for(user, job.job.id).len(), 1);
    }

    #[tokio::test]
    async fn test_left_swipe_creates_no_application() {
        let acme = company("Acme", None);
        let job = listing(&acme, "Backend", true, 1);
        let store = Arc::new(MemoryMatchStore::with(vec![job.clone()]));
        let engine = MatchEngine::new(store.clone());
        let user = Uuid::new_v4();

        let outcome = engine
            .swipe(user, job.job.id, SwipeDirection::Left)
            .await
            .unwrap();
        assert!(outcome.record.application.is_none());
        assert!(outcome.notification.is_none());
        assert!(store.applications_for(user, job.job.id).is_empty());
    }

    #[tokio::test]
    async fn test_inactive_or_unknown_listing_is_not_found() {
        let acme = company("Acme", None);
        let closed = listing(&acme, "Closed", false, 1);
        let store = Arc::new(MemoryMatchStore::with(vec![closed.clone()]));
        let engine = MatchEngine::new(store.clone());
        let user = Uuid::new_v4();

        for job_id in [closed.job.id, Uuid::new_v4()] {
            let result = engine.swipe(user, job_id, SwipeDirection::Right).await;
            assert!(matches!(result, Err(AppError::NotFound(_))));
        }
        assert_eq!(store.write_attempts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_deck_unchanged() {
        let acme = company("Acme", None);
        let job = listing(&acme, "Backend", true, 1);
        let store = MemoryMatchStore {
            fail_writes: true,
            ..MemoryMatchStore::with(vec![job.clone()])
        };
        let engine = MatchEngine::new(Arc::new(store));
        let user = Uuid::new_v4();

        assert!(engine
            .swipe(user, job.job.id, SwipeDirection::Right)
            .await
            .is_err());
        assert_eq!(engine.build_deck(user).await.unwrap().total, 1);
        // The guard was released by the failure.
        assert!(!engine.gate.is_in_flight(user));
    }

    #[tokio::test]
    async fn test_second_swipe_rejected_while_first_in_flight() {
        let acme = company("Acme", None);
        let first_job = listing(&acme, "First", true, 1);
        let second_job = listing(&acme, "Second", true, 2);
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let store = Arc::new(MemoryMatchStore {
            hold: Some((entered.clone(), release.clone())),
            ..MemoryMatchStore::with(vec![first_job.clone(), second_job.clone()])
        });
        let engine = Arc::new(MatchEngine::new(store.clone()));
        let user = Uuid::new_v4();

        let in_flight = {
            let engine = engine.clone();
            let job_id = first_job.job.id;
            tokio::spawn(async move { engine.swipe(user, job_id, SwipeDirection::Right).await })
        };
        entered.notified().await;

        let rejected = engine
            .swipe(user, second_job.job.id, SwipeDirection::Left)
            .await;
        assert!(matches!(rejected, Err(AppError::Conflict(_))));
        assert_eq!(store.write_attempts.load(Ordering::SeqCst), 1);

        release.notify_one();
        in_flight.await.unwrap().unwrap();
        assert!(!engine.gate.is_in_flight(user));
    }
}
