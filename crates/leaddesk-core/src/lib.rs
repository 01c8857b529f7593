//! LeadDesk controller.
//!
//! Keeps a local [`ViewState`] consistent with the backend across operator
//! actions, and sequences the auto-send outbox pipeline.
//!
//! - [`Dashboard`] is the only writer of the view state; every operation
//!   commits all of its changes or none of them
//! - [`Intent`] is the closed set of operator actions, mapped to
//!   operations by [`Dashboard::dispatch`]
//! - [`spawn_worker`] runs intents one at a time on a single task and
//!   publishes [`Snapshot`]s for renderers

pub mod banner;
pub mod config;
pub mod confirm;
pub mod controller;
pub mod dispatch;
pub mod error;
pub mod integrations;
pub mod leads;
pub mod outbox;
pub mod store;
pub mod worker;

#[cfg(test)]
pub(crate) mod testing;

pub use banner::{Banner, BannerKind};
pub use config::DeskConfig;
pub use confirm::{AssumeYes, Confirm, Decline};
pub use controller::{Dashboard, Outcome};
pub use dispatch::Intent;
pub use error::{DeskError, Result};
pub use integrations::{IntegrationsUpdate, OutboundDraft, DEFAULT_CHANNEL};
pub use leads::LimitsUpdate;
pub use store::{Thread, ViewState};
pub use worker::{spawn_worker, with_channel_confirm, ChannelConfirm, DeskHandle, Snapshot, UiEvent};
