//! Drives the feed cache from REST refreshes and the push channel

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, instrument};

use super::cache::{GameFeedCache, RefreshMode};
use crate::common::errors::{ClientError, Result};
use crate::common::traits::{GameEventHandler, GameListSource, PageRequest};
use crate::common::types::{Bucket, ConnectionStatus, GameEvent};
use crate::config::types::FeedConfig;

/// Feed cache shared between the sync task and readers
pub type SharedFeedCache = Arc<RwLock<GameFeedCache>>;

/// Buckets whose fetch failed during a refresh
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshReport {
    pub failed: Vec<Bucket>,
}

impl RefreshReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Keeps a [`GameFeedCache`] in step with the server
pub struct FeedSynchronizer {
    cache: SharedFeedCache,
    source: Arc<dyn GameListSource>,
    page: PageRequest,
    poll_interval: Option<Duration>,
    refresh_mode: RefreshMode,
}

impl FeedSynchronizer {
    pub fn new(cache: SharedFeedCache, source: Arc<dyn GameListSource>, config: &FeedConfig) -> Self {
        let poll_interval = match config.poll_interval_seconds {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        let refresh_mode = if config.keep_previous_data {
            RefreshMode::KeepPrevious
        } else {
            RefreshMode::Replace
        };

        Self {
            cache,
            source,
            page: PageRequest::first(config.page_size),
            poll_interval,
            refresh_mode,
        }
    }

    pub fn cache(&self) -> SharedFeedCache {
        self.cache.clone()
    }

    /// Refresh using the configured mode
    pub async fn refresh_default(&self) -> RefreshReport {
        self.refresh(self.refresh_mode).await
    }

    /// Fetch all three buckets concurrently
    ///
    /// Each result is applied as soon as it arrives; one bucket failing never
    /// holds back or clears the others.
    #[instrument(skip(self))]
    pub async fn refresh(&self, mode: RefreshMode) -> RefreshReport {
        self.cache.write().await.begin_refresh(mode);

        let (upcoming, live, finished) = tokio::join!(
            self.refresh_bucket(Bucket::Upcoming, mode),
            self.refresh_bucket(Bucket::Live, mode),
            self.refresh_bucket(Bucket::Finished, mode),
        );

        let failed = [
            (Bucket::Upcoming, upcoming),
            (Bucket::Live, live),
            (Bucket::Finished, finished),
        ]
        .into_iter()
        .filter_map(|(bucket, ok)| (!ok).then_some(bucket))
        .collect();

        RefreshReport { failed }
    }

    async fn refresh_bucket(&self, bucket: Bucket, mode: RefreshMode) -> bool {
        let result = self
            .source
            .fetch_bucket(bucket, self.page)
            .await
            .map_err(|e| e.to_string());
        let ok = result.is_ok();
        self.cache.write().await.apply_fetch(bucket, result, mode);
        ok
    }

    /// Start applying push events and periodic refreshes in the background
    pub fn spawn(self, events: mpsc::Receiver<GameEvent>) -> FeedSyncHandle {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(self.run(events, shutdown_rx));
        FeedSyncHandle {
            shutdown: Some(shutdown_tx),
            task,
        }
    }

    async fn run(self, mut events: mpsc::Receiver<GameEvent>, mut shutdown: oneshot::Receiver<()>) {
        let mut poll = self.poll_interval.map(|period| {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker
        });
        let mut events_open = true;

        loop {
            tokio::select! {
                biased;

                _ = &mut shutdown => {
                    info!("Feed sync stopping");
                    break;
                }
                event = events.recv(), if events_open => {
                    match event {
                        Some(event) => {
                            let mut cache = self.cache.write().await;
                            dispatch(&mut *cache, &event);
                        }
                        None => {
                            debug!("Push channel closed");
                            events_open = false;
                        }
                    }
                }
                _ = next_tick(&mut poll) => {
                    // Polls never blank what is already on screen
                    let report = self.refresh(RefreshMode::KeepPrevious).await;
                    debug!(failed = ?report.failed, "Periodic refresh done");
                }
            }
        }

        // Drop the receiver before returning so senders see a closed channel
        events.close();
    }
}

async fn next_tick(poll: &mut Option<Interval>) {
    match poll {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

/// Route one push event to a handler, including connection callbacks
pub fn dispatch(handler: &mut dyn GameEventHandler, event: &GameEvent) {
    if let GameEvent::ConnectionStatus(status) = event {
        match status {
            ConnectionStatus::Connected => handler.on_connect(),
            ConnectionStatus::Disconnected(reason) => handler.on_disconnect(reason.as_deref()),
            ConnectionStatus::Error(error) => handler.on_disconnect(Some(error)),
            ConnectionStatus::Reconnecting { .. } => {}
        }
    }
    handler.handle_event(event);
}

/// Handle to the background sync task
///
/// Dropping the handle also stops the task.
pub struct FeedSyncHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl FeedSyncHandle {
    /// Stop the task and wait for it to release the push channel
    pub async fn shutdown(mut self) -> Result<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        (&mut self.task)
            .await
            .map_err(|e| ClientError::Internal(format!("Feed sync task failed: {}", e)))
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
