//! # Photo Album
//!
//! 一个把一组照片做成相册页面的 Rust 应用程序：
//! 为每张照片生成缩略图和中等尺寸图片，显示给用户，询问是否旋转和标题，
//! 最后按输入顺序写入 `index.html`。
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有外部资源，只暴露能力
//! - `ImageTool` - 缩放 / 旋转 / 显示（`MagickTool` 调用 ImageMagick）
//! - `Prompter` - 问一个问题、读一行回答（`StdinPrompter`）
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单张图片
//! - `InputValidator` - 路径和文件头校验
//! - `InteractiveSession` - 两个问题的交互会话
//! - `TokenRing` - 按序号轮流写入页面
//! - `ReportWriter` - 写 index.html 能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一张图片"的完整处理流程
//! - `ItemCtx` - 上下文封装（图片 + 前后 gate）
//! - `ItemPipeline` - 流程编排（派生 → 等待 → 显示 → 交互 → 写入）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_scheduler` - 批量调度器，管理资源和并发
//! - `orchestrator/worker_pool` - 有界 worker 池
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AlbumError, AlbumResult};
pub use infrastructure::{ImageTool, LinePrompter, MagickTool, Prompter, Question, StdinPrompter};
pub use models::{BatchStats, ImageFormat, Item, ItemOutcome, Rotation};
pub use orchestrator::{App, WorkerOutcome, WorkerPool};
pub use utils::logging as logger;
pub use workflow::{ItemCtx, ItemPipeline, Stage};
