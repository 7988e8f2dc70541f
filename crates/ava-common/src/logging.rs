//! ---
//! ava_section: "01-core-functionality"
//! ava_subsection: "module"
//! ava_type: "source"
//! ava_scope: "code"
//! ava_description: "Shared primitives and utilities for the uploader runtime."
//! ava_version: "v0.0.0-prealpha"
//! ava_owner: "tbd"
//! ---
use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::info;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::LoggingConfig;

const LOG_ENV: &str = "AVA_LOG";

/// Available console log formats.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum LogFormat {
    #[default]
    Pretty,
    StructuredJson,
}

/// Initialize the tracing subscriber based on configuration and environment variables.
///
/// * `AVA_LOG` can be set to override the log filter (e.g. `info`, `debug,ava_net=trace`).
///   When unset the standard `RUST_LOG` variable is honoured, finally falling back to
///   the configured `logging.filter`.
/// * Everything goes to stdout; the uploader never writes log files.
pub fn init_tracing(service_name: &str, config: &LoggingConfig) -> Result<()> {
    let filter = resolve_filter(
        std::env::var(LOG_ENV).ok(),
        std::env::var(EnvFilter::DEFAULT_ENV).ok(),
        &config.filter,
    );

    let fmt_layer = match config.format {
        LogFormat::StructuredJson => fmt::layer()
            .with_target(false)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .json()
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .ok();

    info!(service = %service_name, format = ?config.format, "tracing initialised");
    Ok(())
}

fn resolve_filter(custom: Option<String>, standard: Option<String>, fallback: &str) -> EnvFilter {
    for directive in [custom, standard].into_iter().flatten() {
        match EnvFilter::try_new(&directive) {
            Ok(filter) => return filter,
            Err(err) => eprintln!("ignoring invalid log directive '{directive}' ({err})"),
        }
    }
    EnvFilter::try_new(fallback).unwrap_or_else(|_| EnvFilter::new("info"))
}
