//! Serialized intent worker.
//!
//! One task owns the [`Dashboard`] and runs intents strictly one at a time,
//! so no two operations ever interleave over the view state. After each
//! intent it publishes a [`Snapshot`] for renderers.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::banner::Banner;
use crate::confirm::Confirm;
use crate::controller::{Dashboard, Outcome};
use crate::dispatch::Intent;
use crate::error::{DeskError, Result};
use crate::store::ViewState;

/// Immutable copy of what the dashboard shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub state: ViewState,
    pub banner: Banner,
    /// An intent is running.
    pub busy: bool,
    /// Intents finished since the worker started.
    pub completed: u64,
}

impl Snapshot {
    fn of(dashboard: &Dashboard, busy: bool, completed: u64) -> Self {
        Self {
            state: dashboard.state().clone(),
            banner: dashboard.banner().clone(),
            busy,
            completed,
        }
    }
}

/// Side effects the worker asks the presentation layer to perform.
#[derive(Debug)]
pub enum UiEvent {
    /// A message was sent; empty the composer.
    ClearComposer,
    /// Ask the operator; answer on `reply`.
    Confirm {
        prompt: String,
        reply: oneshot::Sender<bool>,
    },
}

/// [`Confirm`] that routes the question to the UI as a [`UiEvent`].
#[derive(Debug, Clone)]
pub struct ChannelConfirm {
    events: mpsc::UnboundedSender<UiEvent>,
}

impl ChannelConfirm {
    pub fn new(events: mpsc::UnboundedSender<UiEvent>) -> Self {
        Self { events }
    }
}

#[async_trait]
impl Confirm for ChannelConfirm {
    async fn confirm(&self, prompt: &str) -> bool {
        let (reply, answer) = oneshot::channel();
        let event = UiEvent::Confirm {
            prompt: prompt.to_string(),
            reply,
        };
        if self.events.send(event).is_err() {
            return false;
        }
        answer.await.unwrap_or(false)
    }
}

/// Sending side of the worker.
#[derive(Debug, Clone)]
pub struct DeskHandle {
    intents: mpsc::UnboundedSender<Intent>,
    snapshots: watch::Receiver<Snapshot>,
}

impl DeskHandle {
    /// Queues an intent behind any already queued.
    pub fn submit(&self, intent: Intent) -> Result<()> {
        self.intents.send(intent).map_err(|_| DeskError::Stopped)
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver that is notified on every publish.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.clone()
    }
}

/// Starts the worker. It stops once every [`DeskHandle`] is dropped.
pub fn spawn_worker(
    mut dashboard: Dashboard,
    events: mpsc::UnboundedSender<UiEvent>,
) -> (DeskHandle, JoinHandle<()>) {
    let (intent_tx, mut intent_rx) = mpsc::unbounded_channel::<Intent>();
    let (snapshot_tx, snapshot_rx) = watch::channel(Snapshot::of(&dashboard, false, 0));

    let handle = tokio::spawn(async move {
        info!("dashboard worker started");
        let mut completed = 0u64;
        while let Some(intent) = intent_rx.recv().await {
            let name = intent.name();
            snapshot_tx.send_replace(Snapshot::of(&dashboard, true, completed));

            match dashboard.dispatch(intent).await {
                Ok(Outcome::Sent) => {
                    let _ = events.send(UiEvent::ClearComposer);
                }
                Ok(outcome) => debug!(intent = name, ?outcome, "intent done"),
                Err(e) => debug!(intent = name, error = %e, "intent failed"),
            }

            completed += 1;
            snapshot_tx.send_replace(Snapshot::of(&dashboard, false, completed));
        }
        info!("dashboard worker stopped");
    });

    (
        DeskHandle {
            intents: intent_tx,
            snapshots: snapshot_rx,
        },
        handle,
    )
}

/// Convenience for wiring a TUI: a dashboard whose confirmations go
/// through `events`.
pub fn with_channel_confirm(
    dashboard: Dashboard,
    events: &mpsc::UnboundedSender<UiEvent>,
) -> Dashboard {
    dashboard.with_confirm(Arc::new(ChannelConfirm::new(events.clone())))
}
