// File: crates/chart-core/src/error.rs
// Summary: Error type shared by chart-core (option resolution, style parsing, axis lookup).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid options for plugin '{plugin}': {source}")]
    InvalidOptions {
        plugin: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid color '{0}': expected #rgb, #rrggbb or #rrggbbaa")]
    InvalidColor(String),

    #[error("invalid font '{0}': expected '<size>px <family>' or '<size>pt <family>'")]
    InvalidFont(String),

    #[error("series {series} references missing {axis} axis #{index}")]
    UnknownAxis {
        series: usize,
        axis: &'static str,
        index: usize,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
