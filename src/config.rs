use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 同时处理的图片数量
    pub max_concurrent_items: usize,
    /// 缩略图尺寸（百分比）
    pub thumbnail_percent: u8,
    /// 中等尺寸（百分比）
    pub medium_percent: u8,
    /// 派生图片和相册页面的输出目录
    pub output_dir: PathBuf,
    /// 相册页面文件名
    pub report_file: String,
    /// ImageMagick 可执行文件
    pub magick_program: String,
    /// 标题最大字符数
    pub caption_max_chars: usize,
    /// 轮询 token 的间隔（毫秒）
    pub token_poll_interval_ms: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_concurrent_items: 3,
            thumbnail_percent: 10,
            medium_percent: 25,
            output_dir: PathBuf::from("."),
            report_file: "index.html".to_string(),
            magick_program: "magick".to_string(),
            caption_max_chars: 49,
            token_poll_interval_ms: 1000,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从环境变量加载，未设置的项使用默认值
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().overlay_env()
    }

    /// 从 TOML 文件加载，再用环境变量覆盖
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::TomlParseFailed {
                path: path.to_path_buf(),
                source,
            })?;
        config.overlay_env()
    }

    fn overlay_env(self) -> Result<Self, ConfigError> {
        Ok(Self {
            max_concurrent_items: env_parsed("ALBUM_MAX_CONCURRENT", "usize")?.unwrap_or(self.max_concurrent_items),
            thumbnail_percent: env_parsed("ALBUM_THUMBNAIL_PERCENT", "u8")?.unwrap_or(self.thumbnail_percent),
            medium_percent: env_parsed("ALBUM_MEDIUM_PERCENT", "u8")?.unwrap_or(self.medium_percent),
            output_dir: std::env::var("ALBUM_OUTPUT_DIR").map(PathBuf::from).unwrap_or(self.output_dir),
            report_file: std::env::var("ALBUM_REPORT_FILE").unwrap_or(self.report_file),
            magick_program: std::env::var("ALBUM_MAGICK").unwrap_or(self.magick_program),
            caption_max_chars: env_parsed("ALBUM_CAPTION_MAX_CHARS", "usize")?.unwrap_or(self.caption_max_chars),
            token_poll_interval_ms: env_parsed("ALBUM_TOKEN_POLL_MS", "u64")?.unwrap_or(self.token_poll_interval_ms),
            verbose_logging: env_parsed("ALBUM_VERBOSE", "bool")?.unwrap_or(self.verbose_logging),
        })
    }

    /// 相册页面的完整路径
    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join(&self.report_file)
    }

    pub fn token_poll_interval(&self) -> Duration {
        Duration::from_millis(self.token_poll_interval_ms)
    }
}

fn env_parsed<T: FromStr>(var_name: &str, expected_type: &'static str) -> Result<Option<T>, ConfigError> {
    match std::env::var(var_name) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type,
            }),
        Err(_) => Ok(None),
    }
}
