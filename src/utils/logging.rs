//! 日志工具模块
//!
//! 提供日志初始化、格式化和输出的辅助函数

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::models::BatchStats;

/// 初始化日志
///
/// 优先使用 `RUST_LOG`；否则 `verbose` 为 true 时输出 debug 级别。
/// 日志写到 stderr，stdout 留给图片提示和用户提问。
/// 重复调用（例如多个测试）时静默忽略。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// 记录程序启动信息
///
/// # 参数
/// - `max_concurrent`: 最大并发数
pub fn log_startup(max_concurrent: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 并发相册处理模式");
    info!("📊 最大并发数: {}", max_concurrent);
    info!("{}", "=".repeat(60));
}

/// 记录图片加载信息
pub fn log_items_loaded(total: usize, max_concurrent: usize) {
    info!("✓ 找到 {} 张待处理的图片", total);
    info!("📋 最多同时处理 {} 张，显示和写入都按输入顺序进行\n", max_concurrent);
}

/// 打印最终统计信息
///
/// # 参数
/// - `stats`: 批次统计
/// - `report_path`: 相册页面路径
pub fn print_final_stats(stats: &BatchStats, report_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", stats.success, stats.total);
    info!("❌ 失败: {}", stats.failed);
    if !stats.failed_indices.is_empty() {
        info!("失败的图片: {:?}", stats.failed_indices);
    }
    info!("📈 最大同时处理数: {}", stats.peak_active);
    info!("{}", "=".repeat(60));
    info!("\n相册已保存至: {}", report_path);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
