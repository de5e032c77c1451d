//! 输入校验服务 - 业务能力层
//!
//! 在任何 worker 启动之前检查所有输入路径

use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tracing::debug;

use crate::error::ValidationError;
use crate::models::image_format::{ImageFormat, HEADER_LEN};

/// 输入校验服务
///
/// 职责：
/// - 至少要有一张图片
/// - 每个路径都能打开读取
/// - 文件头匹配已知的图片格式
pub struct InputValidator;

impl InputValidator {
    /// 校验所有路径，遇到第一个错误就返回
    pub async fn validate(paths: &[PathBuf]) -> Result<Vec<ImageFormat>, ValidationError> {
        if paths.is_empty() {
            return Err(ValidationError::NoImages);
        }

        let mut formats = Vec::with_capacity(paths.len());
        for path in paths {
            formats.push(Self::validate_one(path).await?);
        }
        Ok(formats)
    }

    /// 校验单个路径
    pub async fn validate_one(path: &Path) -> Result<ImageFormat, ValidationError> {
        let unreadable = |source| ValidationError::Unreadable {
            path: path.to_path_buf(),
            source,
        };

        let mut file = File::open(path).await.map_err(unreadable)?;

        let mut header = Vec::with_capacity(HEADER_LEN);
        (&mut file)
            .take(HEADER_LEN as u64)
            .read_to_end(&mut header)
            .await
            .map_err(unreadable)?;

        let format = ImageFormat::sniff(&header).ok_or_else(|| ValidationError::NotAnImage {
            path: path.to_path_buf(),
        })?;

        debug!("{} 识别为 {}", path.display(), format.name());
        Ok(format)
    }
}
