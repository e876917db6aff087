//! Redraw protocol interpreter for the tau editor front-end.
//!
//! Inbound notifications from the embedded editor are decoded into typed
//! [`RedrawEvent`]s and applied in order by the [`RedrawDispatcher`], which
//! owns the highlight table, cursor style machine and grid compositor.
//! The [`Session`] bridges the dispatcher to an [`EditorClient`] for
//! outbound calls (attach, resize, input, commands).

mod args;
pub mod client;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod session;

pub use client::{AttachOptions, ChannelClient, ClientError, EditorClient, EditorRequest};
pub use dispatcher::{Control, PRIMARY_GRID, RedrawDispatcher};
pub use error::RedrawError;
pub use event::{Notification, RedrawEvent};
pub use session::{HostEvent, Session};
