use std::path::PathBuf;

use thiserror::Error;

/// 单个 section adapter 的失败；在组装器内被吞掉并记录为空批次
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("upstream query failed: {0}")]
    Upstream(String),

    #[error("filter not found: {0}")]
    NotFound(String),

    #[error("malformed filter {id}: {reason}")]
    MalformedFilter { id: String, reason: String },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
