use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::core::BuildMode;
use crate::error::ConfigError;

pub const DEFAULT_PORT: u16 = 6060;

/// 运行配置（TOML 文件 → 环境变量 → CLI，后者覆盖前者）
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// 空 = 首页 + 保存过滤器；`frontpage` = 仅首页；否则为逗号分隔的过滤器 id
    pub filters: String,
    pub log_level: String,
    pub listen_port: u16,
    /// 录制数据源（JSON）
    pub fixture_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            filters: String::new(),
            log_level: "info".to_string(),
            listen_port: DEFAULT_PORT,
            fixture_path: None,
        }
    }
}

/// 命令行与环境变量覆盖项；`None` 表示不覆盖
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub filters: Option<String>,
    pub log_level: Option<String>,
    pub listen_port: Option<u16>,
    pub fixture_path: Option<PathBuf>,
}

impl Config {
    pub fn from_toml_str(s: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let s = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&s, path)
    }

    /// 显式路径必须可读；未指定时尝试默认位置，不存在则使用默认值
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match default_config_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn apply(mut self, o: Overrides) -> Self {
        if let Some(v) = o.filters {
            self.filters = v;
        }
        if let Some(v) = o.log_level {
            self.log_level = v;
        }
        if let Some(v) = o.listen_port {
            self.listen_port = v;
        }
        if o.fixture_path.is_some() {
            self.fixture_path = o.fixture_path;
        }
        self
    }

    pub fn build_mode(&self) -> BuildMode {
        BuildMode::from_filters(&self.filters)
    }
}

/// `~/.config/section-index/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("section-index").join("config.toml"))
}
