//! Live Event Stream
//!
//! Native client for the train counter's `/ws` endpoint.
//!
//! ## Architecture
//!
//! - **StreamListener**: Connects, reconnects with backoff and feeds frames
//!   into a [`crate::live::LiveDashboard`]
//! - **ConnectionStatus**: What the connection is doing right now
//! - **ReconnectPolicy**: Backoff and attempt limits from `[stream]` config
//!
//! Renderers subscribe to the `watch` receiver returned by
//! [`StreamListener::new`] and redraw from each [`LiveSnapshot`].

mod listener;
mod status;

pub use listener::{LiveSnapshot, StreamListener, DEFAULT_SNAPSHOT_LOG_LINES};
pub use status::{ConnectionStatus, ReconnectPolicy};
