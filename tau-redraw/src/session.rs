//! Session adapter between the host viewport, the editor client and the dispatcher.
//!
//! Host-side entry points (`on_resize`, `on_key_down`) issue outbound calls;
//! inbound notifications go through the [`RedrawDispatcher`]. Both paths run
//! on one task, so a notification is always applied completely before the
//! next host event is looked at.

use tokio::sync::mpsc;

use crate::client::{AttachOptions, EditorClient};
use crate::dispatcher::{Control, RedrawDispatcher};
use crate::error::RedrawError;
use crate::event::Notification;
use tau_config::Config;
use tau_fonts::{CellMetrics, FontRasterizer, GlyphSource};
use tau_input::{Modifiers, encode_key};

/// Input from the host viewport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    Resize { width: u32, height: u32 },
    Key { key: String, modifiers: Modifiers },
}

pub struct Session<C: EditorClient> {
    client: C,
    dispatcher: RedrawDispatcher,
    metrics: CellMetrics,
    viewport: (u32, u32),
    font_size: f32,
    attached: bool,
    finished: bool,
}

impl<C: EditorClient> Session<C> {
    pub fn new(config: &Config, client: C, glyphs: Box<dyn GlyphSource>) -> Self {
        Self {
            client,
            dispatcher: RedrawDispatcher::new(config, glyphs),
            metrics: CellMetrics::from_config(config),
            viewport: (config.viewport_width, config.viewport_height),
            font_size: config.font_size,
            attached: false,
            finished: false,
        }
    }

    /// Grid size that fits the viewport: `floor(viewport / cell)` per axis.
    pub fn grid_dimensions(&self) -> (u32, u32) {
        self.metrics
            .grid_dimensions(self.viewport.0, self.viewport.1)
    }

    pub fn cell_metrics(&self) -> CellMetrics {
        self.metrics
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    /// Attach the display at the current grid size. Called once at startup.
    pub fn start(&mut self) -> Result<(), RedrawError> {
        let (columns, rows) = self.grid_dimensions();
        log::info!("Attaching display at {}x{} cells", columns, rows);
        self.client
            .attach_display(columns, rows, AttachOptions::default())?;
        self.attached = true;
        Ok(())
    }

    /// The viewport changed size: resize both surfaces and ask the editor for a matching grid.
    pub fn on_resize(&mut self, width: u32, height: u32) -> Result<(), RedrawError> {
        self.viewport = (width, height);
        self.dispatcher
            .compositor_mut()
            .resize_surfaces(width, height);

        let (columns, rows) = self.grid_dimensions();
        if self.attached {
            log::debug!("Requesting grid resize to {}x{}", columns, rows);
            self.client.try_resize_display(columns, rows)?;
        }
        Ok(())
    }

    /// Encode and forward a key press. Returns the sent input, or `None`
    /// when the key has no encoding and was suppressed.
    pub fn on_key_down(
        &mut self,
        key: &str,
        modifiers: Modifiers,
    ) -> Result<Option<String>, RedrawError> {
        match encode_key(key, modifiers) {
            Ok(input) => {
                self.client.send_input(&input)?;
                Ok(Some(input))
            }
            Err(e) => {
                log::warn!("Suppressed key press: {}", e);
                Ok(None)
            }
        }
    }

    /// Apply an inbound notification.
    pub fn on_notification(&mut self, notification: &Notification) -> Result<Control, RedrawError> {
        let control = self.dispatcher.handle_notification(notification)?;
        if control == Control::Quit {
            self.finished = true;
        }
        Ok(control)
    }

    /// Swap in a new glyph source and ask the editor to repaint with it.
    pub fn set_glyph_source(&mut self, glyphs: Box<dyn GlyphSource>) -> Result<(), RedrawError> {
        self.dispatcher
            .compositor_mut()
            .set_glyph_source(glyphs, self.metrics);
        self.client.run_command("redraw")?;
        Ok(())
    }

    /// Load `family` (or the first available monospace family) and repaint with it.
    pub fn set_font(&mut self, family: Option<&str>) -> Result<(), RedrawError> {
        let rasterizer =
            FontRasterizer::new(family, self.font_size).map_err(RedrawError::Font)?;
        self.set_glyph_source(Box::new(rasterizer))
    }

    /// Process host events and notifications until the editor quits or a
    /// notification fails.
    ///
    /// The notification channel closing without a `quit` is treated as a quit.
    pub async fn run(
        &mut self,
        mut notifications: mpsc::UnboundedReceiver<Notification>,
        mut host: mpsc::UnboundedReceiver<HostEvent>,
    ) -> Result<(), RedrawError> {
        let mut host_open = true;
        loop {
            tokio::select! {
                biased;
                notification = notifications.recv() => {
                    let Some(notification) = notification else {
                        log::warn!("Editor channel closed without quit, shutting down");
                        self.finished = true;
                        return Ok(());
                    };
                    if self.on_notification(&notification)? == Control::Quit {
                        return Ok(());
                    }
                }
                event = host.recv(), if host_open => match event {
                    Some(HostEvent::Resize { width, height }) => self.on_resize(width, height)?,
                    Some(HostEvent::Key { key, modifiers }) => {
                        self.on_key_down(&key, modifiers)?;
                    }
                    None => host_open = false,
                },
            }
        }
    }

    /// Whether the editor has quit or disconnected.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn title(&self) -> Option<&str> {
        self.dispatcher.title()
    }

    pub fn dispatcher(&self) -> &RedrawDispatcher {
        &self.dispatcher
    }

    pub fn client(&self) -> &C {
        &self.client
    }
}
