//! File-backed logging for tau.
//!
//! Every `log::info!()`/`log::warn!()` in the workspace ends up in
//! `/tmp/tau_debug.log` on Unix/macOS, or `%TEMP%\tau_debug.log` on Windows.
//! Writing to a file keeps log output out of stdout, which the replay
//! command uses for outbound requests.
//!
//! Level precedence: `--log-level` on the command line, then `RUST_LOG`,
//! then the config file's `log_level`. When `RUST_LOG` is set, records are
//! mirrored to stderr as well.

use parking_lot::Mutex;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use tau_config::LogLevel;

/// Where log records go.
struct DebugLogger {
    file: Option<std::fs::File>,
    mirror_stderr: bool,
}

impl DebugLogger {
    fn open(mirror_stderr: bool) -> Self {
        let log_path = log_path();
        let file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(&log_path)
            .ok();

        let mut logger = DebugLogger {
            file,
            mirror_stderr,
        };
        logger.write_raw(&format!(
            "\n{}\ntau debug session started at {}\n{}\n",
            "=".repeat(80),
            get_timestamp(),
            "=".repeat(80)
        ));
        logger
    }

    fn write_raw(&mut self, msg: &str) {
        if let Some(ref mut file) = self.file {
            let _ = file.write_all(msg.as_bytes());
            let _ = file.flush();
        }
    }

    fn write_record(&mut self, record: &log::Record<'_>) {
        let line = format!(
            "[{}] [{:<5}] [{}] {}\n",
            get_timestamp(),
            record.level(),
            record.target(),
            record.args()
        );
        self.write_raw(&line);
        if self.mirror_stderr {
            eprint!("{line}");
        }
    }
}

/// Path of the session log file.
pub fn log_path() -> PathBuf {
    #[cfg(unix)]
    {
        PathBuf::from("/tmp/tau_debug.log")
    }
    #[cfg(not(unix))]
    {
        std::env::temp_dir().join("tau_debug.log")
    }
}

static LOGGER: OnceLock<Mutex<DebugLogger>> = OnceLock::new();

/// Set once a level came from the CLI or `RUST_LOG`; the config level is ignored afterwards.
static LEVEL_PINNED: AtomicBool = AtomicBool::new(false);

fn get_timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

/// `log::Log` implementation that forwards to the session log file.
struct LogBridge;

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Some(logger) = LOGGER.get() {
            logger.lock().write_record(record);
        }
    }

    fn flush(&self) {
        if let Some(logger) = LOGGER.get()
            && let Some(ref mut file) = logger.lock().file
        {
            let _ = file.flush();
        }
    }
}

static BRIDGE: LogBridge = LogBridge;

/// Parse `RUST_LOG` as a single global level (`debug`, `warn`, ...).
fn env_level() -> Option<log::LevelFilter> {
    let value = std::env::var("RUST_LOG").ok()?;
    // Accept `target=level` lists by taking the last bare level
    value
        .split(',')
        .filter(|part| !part.contains('='))
        .filter_map(|part| part.trim().parse().ok())
        .next_back()
}

/// Install the log bridge. Call once, before anything logs.
///
/// `cli_level` wins over `RUST_LOG`; with neither, logging stays off until
/// [`apply_config_level`] runs.
pub fn init_log_bridge(cli_level: Option<log::LevelFilter>) {
    let env_level = env_level();
    let mirror_stderr = std::env::var_os("RUST_LOG").is_some();
    LOGGER.get_or_init(|| Mutex::new(DebugLogger::open(mirror_stderr)));

    if log::set_logger(&BRIDGE).is_err() {
        return;
    }

    match cli_level.or(env_level) {
        Some(level) => {
            LEVEL_PINNED.store(true, Ordering::Relaxed);
            log::set_max_level(level);
        }
        None => log::set_max_level(log::LevelFilter::Off),
    }
}

/// Apply the config file's level unless the CLI or `RUST_LOG` already chose one.
pub fn apply_config_level(level: LogLevel) {
    if !LEVEL_PINNED.load(Ordering::Relaxed) {
        log::set_max_level(level.to_level_filter());
    }
}
