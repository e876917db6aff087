//! Outbound calls to the embedded editor.
//!
//! All calls are fire-and-forget: they enqueue a request and return without
//! waiting for the editor's reply. The transport that drains the queue is
//! outside this crate.

use serde::Serialize;
use thiserror::Error;
use tokio::sync::mpsc;

/// Options passed when attaching the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AttachOptions {
    /// Request 24-bit colors in highlight definitions
    pub rgb: bool,
    /// Request `grid_line` based redraw events
    pub ext_linegrid: bool,
}

impl Default for AttachOptions {
    fn default() -> Self {
        Self {
            rgb: true,
            ext_linegrid: true,
        }
    }
}

/// A request to the editor, serialized as `{"method": .., "params": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "method", content = "params")]
pub enum EditorRequest {
    #[serde(rename = "nvim_ui_attach")]
    AttachDisplay {
        width: u32,
        height: u32,
        options: AttachOptions,
    },
    #[serde(rename = "nvim_ui_try_resize")]
    TryResizeDisplay { width: u32, height: u32 },
    #[serde(rename = "nvim_input")]
    Input(String),
    #[serde(rename = "nvim_command")]
    Command(String),
}

/// The editor can no longer be reached.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("editor channel closed")]
pub struct ClientError;

/// Outbound half of the editor connection.
pub trait EditorClient {
    fn attach_display(
        &mut self,
        columns: u32,
        rows: u32,
        options: AttachOptions,
    ) -> Result<(), ClientError>;

    fn try_resize_display(&mut self, columns: u32, rows: u32) -> Result<(), ClientError>;

    fn send_input(&mut self, keys: &str) -> Result<(), ClientError>;

    fn run_command(&mut self, command: &str) -> Result<(), ClientError>;
}

/// An [`EditorClient`] that queues requests on a tokio channel.
#[derive(Debug, Clone)]
pub struct ChannelClient {
    tx: mpsc::UnboundedSender<EditorRequest>,
}

impl ChannelClient {
    /// Create a client and the receiver the transport drains.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<EditorRequest>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, request: EditorRequest) -> Result<(), ClientError> {
        log::trace!("Outbound request: {:?}", request);
        self.tx.send(request).map_err(|_| ClientError)
    }
}

impl EditorClient for ChannelClient {
    fn attach_display(
        &mut self,
        columns: u32,
        rows: u32,
        options: AttachOptions,
    ) -> Result<(), ClientError> {
        self.send(EditorRequest::AttachDisplay {
            width: columns,
            height: rows,
            options,
        })
    }

    fn try_resize_display(&mut self, columns: u32, rows: u32) -> Result<(), ClientError> {
        self.send(EditorRequest::TryResizeDisplay {
            width: columns,
            height: rows,
        })
    }

    fn send_input(&mut self, keys: &str) -> Result<(), ClientError> {
        self.send(EditorRequest::Input(keys.to_string()))
    }

    fn run_command(&mut self, command: &str) -> Result<(), ClientError> {
        self.send(EditorRequest::Command(command.to_string()))
    }
}
