//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_scheduler` - 批量图片调度器
//! - 管理应用生命周期（初始化、运行、统计）
//! - 校验输入，创建 token 环和 gate
//! - 按输入顺序为每张图片启动 worker
//!
//! ### `worker_pool` - 有界 worker 池
//! - 控制同时活跃的 worker 数量（Semaphore）
//! - 持有每个 worker 的 JoinHandle
//! - 区分正常完成、返回错误和 panic
//!
//! ## 层次关系
//!
//! ```text
//! batch_scheduler (处理 Vec<Item>)
//!     ↓
//! worker_pool (每张图片一个 worker)
//!     ↓
//! workflow::ItemPipeline (处理单张图片)
//!     ↓
//! services (能力层：校验 / 会话 / token 环 / 页面写入)
//!     ↓
//! infrastructure (基础设施：ImageTool / Prompter)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一职责**：batch_scheduler 管批量，worker_pool 管并发
//! 2. **向下依赖**：编排层 → workflow → services → infrastructure
//! 3. **无业务逻辑**：只做调度和统计，不做具体业务判断

pub mod batch_scheduler;
pub mod worker_pool;

// 重新导出主要类型
pub use batch_scheduler::App;
pub use worker_pool::{WorkerOutcome, WorkerPool};
