//! 批量图片调度器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量图片的调度和资源管理。
//!
//! ## 核心功能
//!
//! 1. **输入校验**：任何 worker 启动之前校验所有路径，失败则整批中止
//! 2. **协调设施**：创建 token 环、相邻图片之间的 gate、相册页面写入器
//! 3. **并发控制**：`WorkerPool` 限制同时活跃的 worker 数量
//! 4. **顺序启动**：按输入顺序为每张图片启动一个 worker
//! 5. **统一回收**：等待所有 worker 结束后才返回，避免还在等输入的 worker 被丢下
//! 6. **全局统计**：汇总所有图片的处理结果
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单张图片的细节，委托给 `ItemPipeline`
//! - **不回滚**：单个 worker 失败不影响已经完成的图片

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use crate::config::Config;
use crate::error::{AlbumError, AlbumResult};
use crate::infrastructure::{ImageTool, MagickTool, Prompter, StdinPrompter};
use crate::models::{BatchStats, Item, ItemOutcome};
use crate::orchestrator::worker_pool::{WorkerOutcome, WorkerPool};
use crate::services::{InputValidator, ReportWriter, TokenRing};
use crate::utils::logging::{log_items_loaded, log_startup, print_final_stats};
use crate::workflow::{gate_chain, ItemCtx, ItemPipeline};

/// 应用主结构
pub struct App {
    config: Config,
    tool: Arc<dyn ImageTool>,
    prompter: Arc<dyn Prompter>,
}

impl App {
    /// 初始化应用：使用 ImageMagick 和标准输入
    pub fn initialize(config: Config) -> Self {
        let tool = Arc::new(MagickTool::new(config.magick_program.clone()));
        let prompter = Arc::new(StdinPrompter::new());
        Self::with_collaborators(config, tool, prompter)
    }

    /// 使用指定的图片工具和输入来源初始化应用
    pub fn with_collaborators(
        config: Config,
        tool: Arc<dyn ImageTool>,
        prompter: Arc<dyn Prompter>,
    ) -> Self {
        log_startup(config.max_concurrent_items);
        Self {
            config,
            tool,
            prompter,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// 运行应用主逻辑
    pub async fn run(&self, paths: Vec<PathBuf>) -> Result<BatchStats> {
        info!("\n📁 正在校验输入图片...");
        InputValidator::validate(&paths)
            .await
            .map_err(AlbumError::from)?;

        log_items_loaded(paths.len(), self.config.max_concurrent_items);

        let stats = self
            .process_all_items(paths)
            .await
            .context("无法启动图片处理")?;

        print_final_stats(&stats, &self.config.report_path().display().to_string());

        Ok(stats)
    }

    /// 处理所有图片
    async fn process_all_items(&self, paths: Vec<PathBuf>) -> AlbumResult<BatchStats> {
        let mut pool = WorkerPool::<ItemOutcome>::new(self.config.max_concurrent_items)?;

        tokio::fs::create_dir_all(&self.config.output_dir)
            .await
            .map_err(|e| {
                AlbumError::infrastructure(format!(
                    "无法创建输出目录 {}: {}",
                    self.config.output_dir.display(),
                    e
                ))
            })?;

        let pipeline = Arc::new(ItemPipeline::new(
            &self.config,
            self.tool.clone(),
            self.prompter.clone(),
            TokenRing::new(self.config.token_poll_interval()),
            ReportWriter::new(self.config.report_path()),
        ));

        let total = paths.len();
        let gates = gate_chain(total);

        for (offset, (path, (gate_in, gate_out))) in paths.into_iter().zip(gates).enumerate() {
            let index = offset + 1;
            let item = Item::new(path, index, &self.config.output_dir);
            info!("{} 开始处理", item);

            let ctx = ItemCtx::new(item, gate_in, gate_out);
            let pipeline = pipeline.clone();
            pool.spawn(index, async move { pipeline.run(ctx).await })
                .await?;
        }

        // 等所有 worker 结束，还在等 gate 或输入的 worker 不能被丢下
        let peak_active = pool.peak();
        let outcomes = pool.join_all().await;

        Ok(tally(total, peak_active, outcomes))
    }
}

fn tally(total: usize, peak_active: usize, outcomes: Vec<WorkerOutcome<ItemOutcome>>) -> BatchStats {
    let mut stats = BatchStats {
        total,
        peak_active,
        ..Default::default()
    };

    for outcome in outcomes {
        match outcome {
            WorkerOutcome::Completed { .. } => stats.success += 1,
            WorkerOutcome::Failed { index, error } => {
                error!("[图片 {}] ❌ 处理过程中发生错误: {}", index, error);
                stats.failed += 1;
                stats.failed_indices.push(index);
            }
            WorkerOutcome::Panicked { index, message } => {
                error!("[图片 {}] ❌ worker 异常退出: {}", index, message);
                stats.failed += 1;
                stats.failed_indices.push(index);
            }
        }
    }

    stats
}
