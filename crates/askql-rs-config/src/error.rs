use std::path::PathBuf;

/// Failures while reading, merging, or checking askql config.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The text is not JSON5; `origin` names the file or source.
    #[error("{origin} is not valid JSON5: {source}")]
    Parse {
        origin: String,
        #[source]
        source: json5::Error,
    },
    /// Schema-valid JSON that still does not fit the config model.
    #[error("{origin} does not match the config model: {source}")]
    Decode {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config at {path}: {message}")]
    InvalidField { path: String, message: String },
}
