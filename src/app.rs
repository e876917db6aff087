//! Headless replay application.
//!
//! Feeds a recorded notification stream through a [`Session`] exactly as a
//! live editor connection would, then reports the outbound requests and
//! optionally writes the presented frame to a PNG file.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tokio::sync::mpsc;

use crate::cli::{ReplayOptions, RuntimeOptions};
use tau_config::Config;
use tau_fonts::{FontRasterizer, GlyphSource, NullGlyphs};
use tau_redraw::{ChannelClient, EditorRequest, Notification, Session};

/// Outcome of a replay run.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayReport {
    /// Requests the session sent to the editor, in order
    pub requests: Vec<EditorRequest>,
    /// Number of notifications read from the input
    pub notifications: usize,
    /// Whether the stream ended with an explicit `quit`
    pub quit_requested: bool,
    pub title: Option<String>,
    pub grid_dimensions: (u32, u32),
}

/// Parse a JSON-lines notification stream. Blank lines and `//` comments are skipped.
pub fn parse_notifications(contents: &str) -> Result<Vec<Notification>> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with("//")
        })
        .map(|(index, line)| {
            serde_json::from_str(line)
                .with_context(|| format!("invalid notification on line {}", index + 1))
        })
        .collect()
}

/// Glyph source for `family`, falling back to no glyphs when no font loads.
pub fn load_glyphs(family: Option<&str>, size_pixels: f32) -> Box<dyn GlyphSource> {
    match FontRasterizer::new(family, size_pixels) {
        Ok(rasterizer) => Box::new(rasterizer),
        Err(e) => {
            log::warn!("No usable font, cells will render without glyphs: {:#}", e);
            Box::new(NullGlyphs)
        }
    }
}

/// Replay `options.file` against a fresh session.
pub fn replay(
    config: &Config,
    options: &ReplayOptions,
    glyphs: Box<dyn GlyphSource>,
) -> Result<ReplayReport> {
    let contents = fs::read_to_string(&options.file)
        .with_context(|| format!("failed to read {}", options.file.display()))?;
    let notifications = parse_notifications(&contents)?;
    log::info!(
        "Replaying {} notifications from {}",
        notifications.len(),
        options.file.display()
    );

    let mut config = config.clone();
    if let Some(width) = options.width {
        config.viewport_width = width;
    }
    if let Some(height) = options.height {
        config.viewport_height = height;
    }

    // The session holds a non-Send glyph source, so it stays on this thread
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let (client, mut outbound) = ChannelClient::new();
        let mut session = Session::new(&config, client, glyphs);
        session.start()?;

        let count = notifications.len();
        let quit_requested = notifications.iter().any(|n| n.method == "quit");
        let (notify_tx, notify_rx) = mpsc::unbounded_channel();
        for notification in notifications {
            notify_tx.send(notification)?;
        }
        drop(notify_tx);
        let (_host_tx, host_rx) = mpsc::unbounded_channel();

        session.run(notify_rx, host_rx).await?;

        if let Some(out) = &options.out {
            save_frame(&session, out)?;
        }

        let mut requests = Vec::new();
        while let Ok(request) = outbound.try_recv() {
            requests.push(request);
        }

        Ok::<_, anyhow::Error>(ReplayReport {
            requests,
            notifications: count,
            quit_requested,
            title: session.title().map(str::to_string),
            grid_dimensions: session.grid_dimensions(),
        })
    })
}

fn save_frame(session: &Session<ChannelClient>, out: &Path) -> Result<()> {
    session
        .dispatcher()
        .compositor()
        .save_screenshot(out)
        .with_context(|| format!("failed to write frame to {}", out.display()))
}

/// Run the replay command: load config, replay, print outbound requests as JSON lines.
pub fn run(options: RuntimeOptions) -> Result<()> {
    let config = match &options.config_path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    crate::debug::apply_config_level(config.log_level);

    let family = options
        .replay
        .font_family
        .as_deref()
        .or(config.font_family.as_deref());
    let glyphs = load_glyphs(family, config.font_size);

    let report = replay(&config, &options.replay, glyphs)?;
    for request in &report.requests {
        println!("{}", serde_json::to_string(request)?);
    }

    if !report.quit_requested {
        log::warn!("Stream ended without quit");
    }
    if let Some(title) = &report.title {
        log::info!("Final title: {}", title);
    }
    log::info!(
        "Replayed {} notifications on a {}x{} grid",
        report.notifications,
        report.grid_dimensions.0,
        report.grid_dimensions.1
    );
    Ok(())
}
