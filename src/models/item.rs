//! 图片处理单元

use std::fmt::Display;
use std::path::{Path, PathBuf};

/// 旋转方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    None,
    Clockwise,
    CounterClockwise,
}

impl Rotation {
    /// 把用户的回答映射为旋转方向
    ///
    /// 只认 "1" 和 "2"，其他任何输入（包括空行）都视为不旋转
    pub fn from_answer(answer: &str) -> Self {
        match answer {
            "1" => Rotation::Clockwise,
            "2" => Rotation::CounterClockwise,
            _ => Rotation::None,
        }
    }

    /// 传给 `convert -rotate` 的角度
    pub fn degrees(&self) -> &'static str {
        match self {
            Rotation::None => "0",
            Rotation::Clockwise => "90",
            Rotation::CounterClockwise => "-90",
        }
    }

    pub fn is_requested(&self) -> bool {
        *self != Rotation::None
    }
}

/// 单张图片
///
/// 只由自己的 worker 修改，写入相册页面后不再变化
#[derive(Debug, Clone)]
pub struct Item {
    /// 输入图片路径
    pub source: PathBuf,
    /// 在批次中的位置（从1开始）
    pub index: usize,
    /// 缩略图路径
    pub thumbnail: PathBuf,
    /// 中等尺寸图片路径
    pub medium: PathBuf,
    /// 用户输入的标题
    pub caption: String,
    /// 用户选择的旋转方向
    pub rotation: Rotation,
}

impl Item {
    /// 创建新的图片处理单元，派生图片放在 `output_dir` 下
    pub fn new(source: PathBuf, index: usize, output_dir: &Path) -> Self {
        let file_name = source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| source.to_string_lossy().into_owned());

        Self {
            thumbnail: output_dir.join(format!("thumb_{}", file_name)),
            medium: output_dir.join(format!("med_{}", file_name)),
            source,
            index,
            caption: String::new(),
            rotation: Rotation::None,
        }
    }

    /// 页面中引用缩略图的相对名字
    pub fn thumbnail_link(&self) -> String {
        link_name(&self.thumbnail)
    }

    /// 页面中引用中等尺寸图片的相对名字
    pub fn medium_link(&self) -> String {
        link_name(&self.medium)
    }
}

fn link_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned()
}

impl Display for Item {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[图片 {}] {}", self.index, self.source.display())
    }
}

/// 单个 worker 的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemOutcome {
    pub index: usize,
    pub rotation: Rotation,
    pub caption: String,
}

/// 处理统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchStats {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    /// 运行期间同时活跃的 worker 的最大数量
    pub peak_active: usize,
    /// 失败的图片序号
    pub failed_indices: Vec<usize>,
}

impl BatchStats {
    /// 序号最小的失败图片
    pub fn first_failure(&self) -> Option<usize> {
        self.failed_indices.iter().copied().min()
    }

    /// 本次运行写进相册页面的图片数量
    ///
    /// 失败图片的后继都停在 gate 上，所以页面里只有第一个失败之前的图片；
    /// 为 0 时页面没有被本次运行改动过
    pub fn reported_items(&self) -> usize {
        self.first_failure()
            .map(|index| index.saturating_sub(1))
            .unwrap_or(self.total)
    }
}
