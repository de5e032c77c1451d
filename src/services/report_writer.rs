//! 相册页面写入服务 - 业务能力层
//!
//! 只负责"往 index.html 追加内容"能力，不关心顺序如何得到保证

use std::path::PathBuf;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::ReportError;
use crate::models::Item;
use crate::services::token_ring::Turn;

/// 相册页面写入服务
///
/// 职责：
/// - 写入缩略图到中等尺寸图片的链接块
/// - 写入标题块
/// - 两个写操作都要求调用方持有 `Turn`，保证只在自己的轮次写入
/// - 第 1 张图片的链接块会截断已有文件，其余都是追加
#[derive(Debug, Clone)]
pub struct ReportWriter {
    report_path: PathBuf,
}

impl ReportWriter {
    pub fn new(report_path: impl Into<PathBuf>) -> Self {
        Self {
            report_path: report_path.into(),
        }
    }

    /// 写入链接块
    pub async fn write_links(&self, turn: &Turn, item: &Item) -> Result<(), ReportError> {
        debug!("[图片 {}] 写入链接块: {}", turn.index(), item.thumbnail_link());

        let block = format!(
            "<a href=\"{}\"><img src=\"{}\"></a>",
            item.medium_link(),
            item.thumbnail_link()
        );
        self.append(&block, turn.index() == 1).await
    }

    /// 写入标题块
    ///
    /// 标题原样写入，不做任何转义
    pub async fn write_caption(&self, turn: &Turn, caption: &str) -> Result<(), ReportError> {
        debug!("[图片 {}] 写入标题块: {}", turn.index(), caption);

        let block = format!("<h2>{}</h2>", caption);
        self.append(&block, false).await
    }

    async fn append(&self, block: &str, truncate: bool) -> Result<(), ReportError> {
        let mut options = OpenOptions::new();
        if truncate {
            options.write(true).create(true).truncate(true);
        } else {
            options.create(true).append(true);
        }

        let mut file = options
            .open(&self.report_path)
            .await
            .map_err(|source| ReportError::OpenFailed {
                path: self.report_path.clone(),
                source,
            })?;

        file.write_all(block.as_bytes())
            .await
            .map_err(|source| ReportError::WriteFailed {
                path: self.report_path.clone(),
                source,
            })?;
        file.flush().await.map_err(|source| ReportError::WriteFailed {
            path: self.report_path.clone(),
            source,
        })?;

        Ok(())
    }
}
