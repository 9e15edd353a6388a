//! Background forecast fetching
//!
//! A single tokio task serves lookup requests one at a time and re-fetches the
//! last loaded location on a timer. Results travel back to the UI loop over a
//! channel, so the UI never waits on the network.

use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::data::{LoadedForecast, LookupError, LookupTarget, WeatherService};

/// Requests sent from the app to the background task
#[derive(Debug, Clone, PartialEq)]
pub enum FetchRequest {
    /// Load a new location
    Load(LookupTarget),
    /// Re-fetch the last loaded location
    Refresh,
}

/// Messages sent from the background task to the app
#[derive(Debug, Clone)]
pub enum FetchMessage {
    /// A lookup started
    Started,
    /// A lookup finished successfully
    Loaded(Box<LoadedForecast>),
    /// A lookup failed; carries the user-facing message
    Failed(String),
}

/// Why a request could not be queued
#[derive(Debug, Error)]
pub enum RequestError {
    /// The queue is full; the request is handed back for a later attempt
    #[error("fetch request queue is full")]
    QueueFull(FetchRequest),

    #[error("fetch task has stopped")]
    Stopped,
}

/// Configuration for automatic refresh
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Time between automatic refreshes
    pub interval: Duration,
    /// Whether auto-refresh is enabled
    pub enabled: bool,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self::from_minutes(10)
    }
}

impl RefreshConfig {
    /// Refresh every `minutes`; zero disables auto-refresh
    pub fn from_minutes(minutes: u64) -> Self {
        Self {
            interval: Duration::from_secs(minutes.saturating_mul(60)),
            enabled: minutes > 0,
        }
    }
}

/// Capacity of the request queue
const REQUEST_QUEUE: usize = 8;

/// Handle for talking to the background fetch task
pub struct FetchHandle {
    /// Channel for receiving fetch results
    pub receiver: mpsc::Receiver<FetchMessage>,
    requests: mpsc::Sender<FetchRequest>,
    /// Signals shutdown
    shutdown_tx: mpsc::Sender<()>,
}

impl FetchHandle {
    /// Spawns the background task
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(service: WeatherService, config: RefreshConfig) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel(32);
        let (req_tx, mut req_rx) = mpsc::channel::<FetchRequest>(REQUEST_QUEUE);
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        tokio::spawn(async move {
            // A zero period would panic; the tick is ignored when disabled anyway
            let period = config.interval.max(Duration::from_secs(1));
            let mut interval = tokio::time::interval(period);
            // Skip the first tick (immediate)
            interval.tick().await;

            let mut last_target: Option<LookupTarget> = None;

            loop {
                let target = tokio::select! {
                    request = req_rx.recv() => match request {
                        Some(FetchRequest::Load(target)) => Some(target),
                        Some(FetchRequest::Refresh) => last_target.clone(),
                        None => break,
                    },
                    _ = interval.tick(), if config.enabled => {
                        tracing::debug!("Automatic refresh");
                        last_target.clone()
                    }
                    _ = shutdown_rx.recv() => break,
                };

                let Some(target) = target else {
                    continue;
                };

                if msg_tx.send(FetchMessage::Started).await.is_err() {
                    break;
                }

                let message = match service.lookup(target).await {
                    Ok(loaded) => {
                        // Refreshes reuse the resolved coordinates instead of geocoding again
                        last_target = Some(LookupTarget::Coordinates {
                            location: loaded.location,
                            label: Some(loaded.place_name.clone()),
                        });
                        FetchMessage::Loaded(Box::new(loaded))
                    }
                    Err(e) => {
                        tracing::warn!("Lookup failed: {}", e);
                        last_target = None;
                        FetchMessage::Failed(LookupError::USER_MESSAGE.to_string())
                    }
                };
                interval.reset();

                if msg_tx.send(message).await.is_err() {
                    break;
                }
            }
            tracing::debug!("Fetch task stopped");
        });

        Self {
            receiver: msg_rx,
            requests: req_tx,
            shutdown_tx,
        }
    }

    /// Queues a request without blocking
    pub fn request(&self, request: FetchRequest) -> Result<(), RequestError> {
        self.requests.try_send(request).map_err(|e| match e {
            TrySendError::Full(request) => RequestError::QueueFull(request),
            TrySendError::Closed(_) => RequestError::Stopped,
        })
    }

    /// Checks for a pending message without blocking
    pub fn try_recv(&mut self) -> Option<FetchMessage> {
        self.receiver.try_recv().ok()
    }

    /// Stops the background task
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}
