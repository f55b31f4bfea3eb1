//! Tracing setup for the `idl-ir` binary.
//!
//! ```bash
//! IDL_IR_LOG=debug idl-ir Foo.json
//! IDL_IR_LOG="idl_ir::merge=trace" IDL_IR_LOG_FORMAT=json idl-ir *.json
//! ```
//!
//! Nothing is installed unless `IDL_IR_LOG` or `RUST_LOG` is set.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter, Registry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    fn from_env() -> Self {
        Self::parse(&std::env::var("IDL_IR_LOG_FORMAT").unwrap_or_default())
    }
}

/// `IDL_IR_LOG` wins over `RUST_LOG`.
fn build_filter() -> EnvFilter {
    match std::env::var("IDL_IR_LOG") {
        Ok(val) => EnvFilter::builder().parse_lossy(val),
        Err(_) => EnvFilter::from_default_env(),
    }
}

/// Install the global subscriber. Output goes to stderr; stdout carries the
/// projection.
pub fn init_tracing() {
    if std::env::var("IDL_IR_LOG").is_err() && std::env::var("RUST_LOG").is_err() {
        return;
    }

    let filter = build_filter();
    match LogFormat::from_env() {
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);
            Registry::default().with(filter).with(json_layer).init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
