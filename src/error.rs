use std::path::PathBuf;
use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AlbumError {
    /// 输入校验错误（任何 worker 启动之前报告）
    #[error("输入错误: {0}")]
    Validation(#[from] ValidationError),
    /// 外部图片工具错误
    #[error("图片工具错误: {0}")]
    Transform(#[from] TransformError),
    /// 协调信号（gate / token / 会话）错误
    #[error("协调错误: {0}")]
    Coordination(#[from] CoordinationError),
    /// 相册页面写入错误
    #[error("写入错误: {0}")]
    Report(#[from] ReportError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 基础设施创建失败，整个批次直接中止
    #[error("基础设施错误: {0}")]
    Infrastructure(String),
}

/// 输入校验错误
#[derive(Debug, Error)]
pub enum ValidationError {
    /// 没有给出任何图片
    #[error("Usage: photo-album [img]+")]
    NoImages,
    /// 路径不存在或不可读
    #[error("图片路径不可读: {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 文件头不匹配任何已知图片格式
    #[error("不是有效的图片文件: {path}")]
    NotAnImage { path: PathBuf },
}

/// 外部图片工具错误
#[derive(Debug, Error)]
pub enum TransformError {
    /// 无法启动外部程序
    #[error("无法启动 {program} ({operation} {path}): {source}")]
    SpawnFailed {
        program: String,
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 外部程序以非零状态退出
    #[error("{program} {operation} 失败 ({path}): {status}")]
    NonZeroExit {
        program: String,
        operation: &'static str,
        path: PathBuf,
        status: std::process::ExitStatus,
    },
    /// 派生任务被中断
    #[error("派生任务中断 ({path}): {reason}")]
    Interrupted { path: PathBuf, reason: String },
}

/// 协调错误
#[derive(Debug, Error)]
pub enum CoordinationError {
    /// 前驱在发送 gate 信号之前退出
    #[error("图片 {index} 的前驱已退出，gate 信号不会到达")]
    GateClosed { index: usize },
    /// token 环被关闭
    #[error("token 环已关闭 (图片 {index})")]
    TokenRingClosed { index: usize },
    /// 交互会话的辅助任务已退出
    #[error("交互会话已关闭 (图片 {index})")]
    SessionClosed { index: usize },
    /// 读取用户输入失败
    #[error("读取用户输入失败: {0}")]
    Input(#[source] std::io::Error),
}

/// 相册页面写入错误
#[derive(Debug, Error)]
pub enum ReportError {
    /// 打开页面文件失败
    #[error("无法打开 {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 写入页面文件失败
    #[error("写入 {path} 失败: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: &'static str,
    },
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

// ========== 便捷构造函数 ==========

impl AlbumError {
    /// 创建基础设施错误
    pub fn infrastructure(msg: impl Into<String>) -> Self {
        AlbumError::Infrastructure(msg.into())
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AlbumResult<T> = Result<T, AlbumError>;
