//! # ragsearch-telemetry
//!
//! Logging setup shared by the RAG Search binaries, plus an in-memory span
//! recorder for asserting on instrumentation in tests.
//!
//! `RUST_LOG` takes precedence over configured levels:
//!
//! ```bash
//! RUST_LOG=ragsearch_graph=debug ragsearch ask "What is deep learning?"
//! ```

pub mod recorder;

use std::collections::BTreeMap;
use std::sync::Once;

use serde::{Deserialize, Serialize};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

pub use recorder::{RecordedSpan, SpanRecorder};

static INIT: Once = Once::new();

/// Output format of the log layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable single-line records.
    #[default]
    Compact,
    /// One JSON object per record.
    Json,
}

/// Log level configuration.
///
/// ```toml
/// level = "warn"
/// format = "json"
///
/// [modules]
/// ragsearch_rag = "debug"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level for every target.
    pub level: String,
    pub format: LogFormat,
    /// Per-target overrides.
    pub modules: BTreeMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "warn".to_string(), format: LogFormat::Compact, modules: BTreeMap::new() }
    }
}

impl LoggingConfig {
    pub fn with_level(level: impl Into<String>) -> Self {
        Self { level: level.into(), ..Self::default() }
    }

    /// The `EnvFilter` directive string, e.g. `warn,ragsearch_rag=debug`.
    pub fn directives(&self) -> String {
        let mut directives = self.level.clone();
        for (module, level) in &self.modules {
            directives.push_str(&format!(",{module}={level}"));
        }
        directives
    }
}

/// Install the global subscriber. Only the first call has any effect.
pub fn init_with_config(config: &LoggingConfig) {
    INIT.call_once(|| {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::try_new(config.directives()).unwrap_or_else(|_| EnvFilter::new("warn"))
        };

        let layer = match config.format {
            LogFormat::Compact => tracing_subscriber::fmt::layer()
                .compact()
                .with_target(true)
                .with_writer(std::io::stderr)
                .boxed(),
            LogFormat::Json => tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_writer(std::io::stderr)
                .boxed(),
        };

        // Another subscriber may already be installed, e.g. by a test harness.
        let _ = tracing_subscriber::registry().with(layer.with_filter(filter)).try_init();
    });
}

/// Install the global subscriber at `level` with compact output.
pub fn init_with_level(level: &str) {
    init_with_config(&LoggingConfig::with_level(level));
}

/// Install the global subscriber with defaults (`warn`, compact).
pub fn init() {
    init_with_config(&LoggingConfig::default());
}
