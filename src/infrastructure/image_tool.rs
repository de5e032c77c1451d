//! 图片工具 - 基础设施层
//!
//! 持有外部程序（ImageMagick），只暴露"缩放 / 旋转 / 显示"的能力

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::debug;

use crate::error::TransformError;
use crate::models::Rotation;

/// 外部图片工具
///
/// 职责：
/// - 派生指定百分比尺寸的图片
/// - 原地旋转图片
/// - 显示图片并等待用户关闭
/// - 不认识 Item，不关心顺序
#[async_trait]
pub trait ImageTool: Send + Sync {
    /// 把 `source` 缩放到 `percent`% 并写到 `target`
    async fn derive(&self, source: &Path, target: &Path, percent: u8) -> Result<PathBuf, TransformError>;

    /// 原地旋转 `artifact`
    async fn rotate(&self, artifact: &Path, rotation: Rotation) -> Result<(), TransformError>;

    /// 显示 `artifact`，直到用户关闭窗口才返回
    async fn display(&self, artifact: &Path) -> Result<(), TransformError>;
}

/// 基于 `magick` 命令的实现
#[derive(Debug, Clone)]
pub struct MagickTool {
    program: String,
}

impl MagickTool {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    async fn run(&self, operation: &'static str, path: &Path, args: &[&str]) -> Result<(), TransformError> {
        debug!("执行 {} {}", self.program, args.join(" "));

        let status = Command::new(&self.program)
            .args(args)
            .status()
            .await
            .map_err(|source| TransformError::SpawnFailed {
                program: self.program.clone(),
                operation,
                path: path.to_path_buf(),
                source,
            })?;

        if !status.success() {
            return Err(TransformError::NonZeroExit {
                program: self.program.clone(),
                operation,
                path: path.to_path_buf(),
                status,
            });
        }

        Ok(())
    }
}

#[async_trait]
impl ImageTool for MagickTool {
    async fn derive(&self, source: &Path, target: &Path, percent: u8) -> Result<PathBuf, TransformError> {
        let size = format!("{}%", percent);
        let source_arg = source.to_string_lossy();
        let target_arg = target.to_string_lossy();
        self.run(
            "resize",
            source,
            &["convert", "-resize", size.as_str(), &*source_arg, &*target_arg],
        )
        .await?;
        Ok(target.to_path_buf())
    }

    async fn rotate(&self, artifact: &Path, rotation: Rotation) -> Result<(), TransformError> {
        let artifact_arg = artifact.to_string_lossy();
        self.run(
            "rotate",
            artifact,
            &["convert", "-rotate", rotation.degrees(), &*artifact_arg, &*artifact_arg],
        )
        .await
    }

    async fn display(&self, artifact: &Path) -> Result<(), TransformError> {
        let artifact_arg = artifact.to_string_lossy();
        self.run("display", artifact, &["display", &*artifact_arg]).await
    }
}
