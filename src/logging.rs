//! Logging infrastructure - structured tracing for the shim's tooling
//!
//! Design: `tracing` events with a `tracing-subscriber` fmt layer:
//! - Level and format from `GUILE_SHIM_LOG_*` environment variables
//! - Optional JSON output and span events
//! - Optional file output through `tracing-appender`
//!
//! The generated proxies never log; the list builder, the reference heap,
//! configuration loading and the CLI do.

use once_cell::sync::OnceCell;
use std::io;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

pub use tracing::{debug, error, info, trace, warn};

static LOGGER_INITIALIZED: OnceCell<()> = OnceCell::new();

/// Logging configuration
#[derive(Debug, Clone, PartialEq)]
pub struct LogConfig {
    /// Default log level
    pub level: Level,
    /// Write to this file instead of stderr
    pub log_path: Option<PathBuf>,
    /// JSON lines instead of human-readable output
    pub json_format: bool,
    /// Emit span enter/close events
    pub show_spans: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            log_path: None,
            json_format: false,
            show_spans: false,
        }
    }
}

impl LogConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        // GUILE_SHIM_LOG_LEVEL: trace, debug, info, warn, error
        if let Some(level) = lookup("GUILE_SHIM_LOG_LEVEL") {
            config.level = parse_level(&level).unwrap_or(Level::WARN);
        }

        // GUILE_SHIM_LOG_FILE: path to log file
        if let Some(path) = lookup("GUILE_SHIM_LOG_FILE") {
            config.log_path = Some(PathBuf::from(path));
        }

        config.json_format = lookup("GUILE_SHIM_LOG_JSON").is_some();
        config.show_spans = lookup("GUILE_SHIM_LOG_SPANS").is_some();

        config
    }

    /// Verbose config for interactive debugging
    pub fn verbose() -> Self {
        Self {
            level: Level::DEBUG,
            show_spans: true,
            ..Self::default()
        }
    }
}

fn parse_level(level: &str) -> Option<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

/// Initialize logging from the environment
pub fn init() -> Option<WorkerGuard> {
    init_with_config(LogConfig::from_env())
}

/// Initialize logging with custom configuration
///
/// Only the first call installs a subscriber. When logging to a file the
/// returned guard must be kept alive to flush it.
pub fn init_with_config(config: LogConfig) -> Option<WorkerGuard> {
    let mut guard = None;

    LOGGER_INITIALIZED.get_or_init(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(config.level));

        let span_events = if config.show_spans {
            FmtSpan::ENTER | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };

        let (writer, worker) = match &config.log_path {
            Some(path) => {
                let (dir, file) = split_log_path(path);
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file))
            }
            None => tracing_appender::non_blocking(io::stderr()),
        };
        guard = Some(worker);

        let layer = fmt::layer()
            .with_writer(writer)
            .with_span_events(span_events)
            .with_target(true);

        let registry = tracing_subscriber::registry().with(env_filter);
        // A host that installed its own subscriber keeps it.
        if config.json_format {
            registry.with(layer.json()).try_init().ok();
        } else {
            registry.with(layer.compact()).try_init().ok();
        }
    });

    guard
}

/// Filter used when `RUST_LOG` is unset.
///
/// Components log under their module path (`guile_shim::list`,
/// `guile_shim::heap`, ...), so one crate-wide directive covers all of them.
fn default_filter(level: Level) -> EnvFilter {
    EnvFilter::new(format!("guile_shim={}", level.as_str().to_lowercase()))
}

fn split_log_path(path: &Path) -> (PathBuf, PathBuf) {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let file = path
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("guile-shim.log"));
    (dir, file)
}

/// Check if logging is initialized
pub fn is_initialized() -> bool {
    LOGGER_INITIALIZED.get().is_some()
}

/// Log generated artifacts
pub fn log_codegen(path: &Path, entries: usize) {
    info!(
        event = "codegen",
        path = %path.display(),
        entries,
        "proxy artifact written"
    );
}

/// Log configuration discovery
pub fn log_config(config_dir: &Path, library: &str) {
    debug!(
        event = "config",
        dir = %config_dir.display(),
        library,
        "configuration resolved"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heap::Heap;
    use crate::list;
    use crate::primitives::Primitives;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tracing::{Event, Subscriber};
    use tracing_subscriber::layer::{Context, Layer};

    #[test]
    fn test_config_from_lookup() {
        let env: HashMap<&str, &str> = [
            ("GUILE_SHIM_LOG_LEVEL", "DEBUG"),
            ("GUILE_SHIM_LOG_JSON", "1"),
            ("GUILE_SHIM_LOG_FILE", "logs/shim.log"),
        ]
        .into_iter()
        .collect();

        let config = LogConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.level, Level::DEBUG);
        assert!(config.json_format);
        assert!(!config.show_spans);
        assert_eq!(config.log_path, Some(PathBuf::from("logs/shim.log")));
    }

    #[test]
    fn test_unknown_level_falls_back() {
        let config = LogConfig::from_lookup(|key| {
            (key == "GUILE_SHIM_LOG_LEVEL").then(|| "loud".to_string())
        });
        assert_eq!(config.level, Level::WARN);
    }

    #[test]
    fn test_split_log_path() {
        assert_eq!(
            split_log_path(Path::new("shim.log")),
            (PathBuf::from("."), PathBuf::from("shim.log"))
        );
        assert_eq!(
            split_log_path(Path::new("/var/log/shim.log")),
            (PathBuf::from("/var/log"), PathBuf::from("shim.log"))
        );
    }

    #[derive(Clone, Default)]
    struct Targets(Arc<Mutex<Vec<String>>>);

    impl<S: Subscriber> Layer<S> for Targets {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            self.0.lock().push(event.metadata().target().to_string());
        }
    }

    #[test]
    fn test_default_filter_enables_component_events() {
        let seen = Targets::default();
        let subscriber = tracing_subscriber::registry()
            .with(default_filter(Level::TRACE))
            .with(seen.clone());

        tracing::subscriber::with_default(subscriber, || {
            let heap = Heap::new();
            let elts = [heap.bool_t(), heap.undefined()];
            unsafe { list::list_n(&heap, elts.as_ptr()) };
        });

        let targets = seen.0.lock();
        assert!(targets.iter().any(|t| t == "guile_shim::heap"), "{:?}", targets);
        assert!(targets.iter().any(|t| t == "guile_shim::list"), "{:?}", targets);
    }

    #[test]
    fn test_default_filter_respects_level() {
        let seen = Targets::default();
        let subscriber = tracing_subscriber::registry()
            .with(default_filter(Level::WARN))
            .with(seen.clone());

        tracing::subscriber::with_default(subscriber, || {
            let heap = Heap::new();
            heap.cons(heap.bool_t(), heap.eol());
        });

        assert!(seen.0.lock().is_empty());
    }

    #[test]
    fn test_init_idempotent() {
        let _first = init_with_config(LogConfig::default());
        let second = init_with_config(LogConfig::verbose());
        assert!(second.is_none());
        assert!(is_initialized());
    }
}
