//! 图片处理流程 - 流程层
//!
//! 核心职责：定义"一张图片"的完整处理流程
//!
//! 流程顺序：
//! 1. 派生缩略图和中等尺寸图片（并发，只等缩略图）
//! 2. 等前驱的 gate 信号（第 1 张图片跳过）
//! 3. 显示缩略图，等用户关闭
//! 4. 问旋转方向，需要时旋转两张派生图，再问标题
//! 5. 轮到自己时写链接块和标题块
//! 6. 释放 token，打开后继的 gate

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{AlbumResult, TransformError};
use crate::infrastructure::{ImageTool, Prompter};
use crate::models::{Item, ItemOutcome, Rotation};
use crate::services::{InteractiveSession, ReportWriter, TokenRing};
use crate::utils::logging::truncate_text;
use crate::workflow::item_ctx::ItemCtx;

/// 流程所处的阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Deriving,
    GatedForDisplay,
    Displaying,
    Interacting,
    ConditionallyTransforming,
    Reporting,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Deriving => "派生",
            Stage::GatedForDisplay => "等待前驱",
            Stage::Displaying => "显示",
            Stage::Interacting => "交互",
            Stage::ConditionallyTransforming => "旋转",
            Stage::Reporting => "写入页面",
            Stage::Done => "完成",
        };
        f.write_str(name)
    }
}

/// 图片处理流程
///
/// - 编排单张图片的完整处理流程
/// - 决定何时显示、何时提问、何时写入
/// - 所有 worker 共享同一个实例，状态都在 `ItemCtx` 里
pub struct ItemPipeline {
    tool: Arc<dyn ImageTool>,
    prompter: Arc<dyn Prompter>,
    ring: TokenRing,
    report: ReportWriter,
    thumbnail_percent: u8,
    medium_percent: u8,
    caption_max_chars: usize,
}

impl ItemPipeline {
    /// 创建新的图片处理流程
    pub fn new(
        config: &Config,
        tool: Arc<dyn ImageTool>,
        prompter: Arc<dyn Prompter>,
        ring: TokenRing,
        report: ReportWriter,
    ) -> Self {
        Self {
            tool,
            prompter,
            ring,
            report,
            thumbnail_percent: config.thumbnail_percent,
            medium_percent: config.medium_percent,
            caption_max_chars: config.caption_max_chars,
        }
    }

    pub async fn run(&self, ctx: ItemCtx) -> AlbumResult<ItemOutcome> {
        let ItemCtx {
            mut item,
            gate_in,
            gate_out,
        } = ctx;
        let index = item.index;

        // ========== 派生 ==========
        enter(index, Stage::Deriving);

        // 中等尺寸放到后台，只有缩略图挡住显示
        let medium_task = BackgroundDerive::spawn(
            self.tool.clone(),
            item.source.clone(),
            item.medium.clone(),
            self.medium_percent,
        );

        self.tool
            .derive(&item.source, &item.thumbnail, self.thumbnail_percent)
            .await?;
        info!("[图片 {}] ✓ 缩略图已生成: {}", index, item.thumbnail.display());

        // ========== 等待前驱 ==========
        if let Some(gate) = gate_in {
            enter(index, Stage::GatedForDisplay);
            gate.wait().await?;
        }

        // ========== 显示 ==========
        enter(index, Stage::Displaying);
        println!("=============== {} ===============", item.source.display());
        println!("Please close the image to continue!");
        self.tool.display(&item.thumbnail).await?;

        // ========== 交互 ==========
        enter(index, Stage::Interacting);
        let session = InteractiveSession::open(
            index,
            item.source.display().to_string(),
            self.prompter.clone(),
            self.caption_max_chars,
        );
        let (rotation, pending_caption) = session.ask_rotation().await?;
        item.rotation = rotation;

        let medium = medium_task.join().await?;
        debug!("[图片 {}] 中等尺寸图片已生成: {}", index, medium.display());

        if rotation.is_requested() {
            enter(index, Stage::ConditionallyTransforming);
            self.rotate_both(&item, rotation).await?;
        }

        item.caption = pending_caption.ask_caption().await?;
        info!(
            "[图片 {}] ✓ 标题: {}",
            index,
            truncate_text(&item.caption, 20)
        );

        // ========== 写入页面 ==========
        enter(index, Stage::Reporting);
        let turn = self.ring.acquire(index).await?;
        self.report.write_links(&turn, &item).await?;
        self.report.write_caption(&turn, &item.caption).await?;
        turn.release()?;

        if let Some(gate) = gate_out {
            if !gate.open() {
                warn!("[图片 {}] ⚠️ 后继已退出，gate 信号无人接收", index);
            }
        }

        enter(index, Stage::Done);
        println!();

        Ok(ItemOutcome {
            index,
            rotation: item.rotation,
            caption: item.caption,
        })
    }

    /// 两张派生图同时旋转
    async fn rotate_both(&self, item: &Item, rotation: Rotation) -> Result<(), TransformError> {
        info!("[图片 {}] 🔄 旋转 {}°", item.index, rotation.degrees());
        tokio::try_join!(
            self.tool.rotate(&item.thumbnail, rotation),
            self.tool.rotate(&item.medium, rotation),
        )?;
        Ok(())
    }
}

/// 后台派生任务
///
/// 流程提前返回时随之 drop，drop 会取消还没完成的派生
struct BackgroundDerive {
    target: PathBuf,
    handle: JoinHandle<Result<PathBuf, TransformError>>,
}

impl BackgroundDerive {
    fn spawn(tool: Arc<dyn ImageTool>, source: PathBuf, target: PathBuf, percent: u8) -> Self {
        let task_target = target.clone();
        let handle = tokio::spawn(async move { tool.derive(&source, &task_target, percent).await });
        Self { target, handle }
    }

    async fn join(mut self) -> Result<PathBuf, TransformError> {
        match (&mut self.handle).await {
            Ok(result) => result,
            Err(e) => Err(TransformError::Interrupted {
                path: self.target.clone(),
                reason: e.to_string(),
            }),
        }
    }
}

impl Drop for BackgroundDerive {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn enter(index: usize, stage: Stage) {
    debug!("[图片 {}] → {}", index, stage);
}
