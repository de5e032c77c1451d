//! 集成测试共用的假图片工具和脚本化输入

#![allow(dead_code)]

use async_trait::async_trait;
use photo_album::error::{CoordinationError, TransformError};
use photo_album::{Config, ImageTool, Prompter, Question, Rotation};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

/// 测试中观察到的事件，按发生顺序记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    DeriveDone { target: String },
    DisplayStart { artifact: String },
    DisplayEnd { artifact: String },
    Rotate { artifact: String, rotation: Rotation },
    Asked { item: String, question: Question },
    Answered { item: String, question: Question },
}

#[derive(Debug, Clone, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<Event>>>,
    // 从开始派生缩略图到回答完标题之间的图片数量
    in_flight: Arc<AtomicUsize>,
    peak_in_flight: Arc<AtomicUsize>,
}

impl Recorder {
    pub fn item_started(&self) {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
    }

    pub fn item_finished(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    pub fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn position(&self, event: &Event) -> usize {
        self.events()
            .iter()
            .position(|e| e == event)
            .unwrap_or_else(|| panic!("事件未发生: {:?}", event))
    }

    pub fn rotations(&self) -> Vec<(String, Rotation)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Rotate { artifact, rotation } => Some((artifact, rotation)),
                _ => None,
            })
            .collect()
    }

    pub fn derive_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, Event::DeriveDone { .. }))
            .count()
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned()
}

/// 假的图片工具：派生时复制文件，可以按源文件名或目标文件名注入延迟和失败
#[derive(Default)]
pub struct FakeTool {
    pub recorder: Recorder,
    pub derive_delays: HashMap<String, Duration>,
    pub failing_sources: HashSet<String>,
    pub target_delays: HashMap<String, Duration>,
    pub failing_targets: HashSet<String>,
}

impl FakeTool {
    pub fn new(recorder: Recorder) -> Self {
        Self {
            recorder,
            ..Default::default()
        }
    }

    pub fn delay_derive(mut self, source: &str, delay: Duration) -> Self {
        self.derive_delays.insert(source.to_string(), delay);
        self
    }

    pub fn fail_derive(mut self, source: &str) -> Self {
        self.failing_sources.insert(source.to_string());
        self
    }

    pub fn delay_target(mut self, target: &str, delay: Duration) -> Self {
        self.target_delays.insert(target.to_string(), delay);
        self
    }

    pub fn fail_target(mut self, target: &str) -> Self {
        self.failing_targets.insert(target.to_string());
        self
    }
}

#[async_trait]
impl ImageTool for FakeTool {
    async fn derive(&self, source: &Path, target: &Path, _percent: u8) -> Result<PathBuf, TransformError> {
        let name = file_name(source);
        let target_name = file_name(target);
        if target_name.starts_with("thumb_") {
            self.recorder.item_started();
        }
        if let Some(delay) = self.derive_delays.get(&name) {
            tokio::time::sleep(*delay).await;
        }
        if let Some(delay) = self.target_delays.get(&target_name) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing_sources.contains(&name) || self.failing_targets.contains(&target_name) {
            return Err(TransformError::Interrupted {
                path: source.to_path_buf(),
                reason: "injected failure".to_string(),
            });
        }

        tokio::fs::copy(source, target)
            .await
            .map_err(|e| TransformError::Interrupted {
                path: target.to_path_buf(),
                reason: e.to_string(),
            })?;
        self.recorder.push(Event::DeriveDone {
            target: target_name,
        });
        Ok(target.to_path_buf())
    }

    async fn rotate(&self, artifact: &Path, rotation: Rotation) -> Result<(), TransformError> {
        self.recorder.push(Event::Rotate {
            artifact: file_name(artifact),
            rotation,
        });
        Ok(())
    }

    async fn display(&self, artifact: &Path) -> Result<(), TransformError> {
        let artifact = file_name(artifact);
        self.recorder.push(Event::DisplayStart {
            artifact: artifact.clone(),
        });
        tokio::time::sleep(Duration::from_millis(5)).await;
        self.recorder.push(Event::DisplayEnd { artifact });
        Ok(())
    }
}

/// 一张图片的脚本化回答
#[derive(Debug, Clone)]
pub struct Script {
    pub rotation: String,
    pub caption: String,
    pub caption_delay: Duration,
}

/// 按图片文件名返回预设回答
#[derive(Default)]
pub struct ScriptedPrompter {
    pub recorder: Recorder,
    pub scripts: HashMap<String, Script>,
}

impl ScriptedPrompter {
    pub fn new(recorder: Recorder) -> Self {
        Self {
            recorder,
            scripts: HashMap::new(),
        }
    }

    pub fn answer(mut self, item: &str, rotation: &str, caption: &str) -> Self {
        self.scripts.insert(
            item.to_string(),
            Script {
                rotation: rotation.to_string(),
                caption: caption.to_string(),
                caption_delay: Duration::ZERO,
            },
        );
        self
    }

    pub fn slow_caption(mut self, item: &str, delay: Duration) -> Self {
        if let Some(script) = self.scripts.get_mut(item) {
            script.caption_delay = delay;
        }
        self
    }
}

#[async_trait]
impl Prompter for ScriptedPrompter {
    async fn ask(&self, item: &str, question: Question) -> Result<String, CoordinationError> {
        let item = file_name(Path::new(item));
        self.recorder.push(Event::Asked {
            item: item.clone(),
            question,
        });

        let script = self
            .scripts
            .get(&item)
            .cloned()
            .ok_or_else(|| CoordinationError::Input(std::io::ErrorKind::UnexpectedEof.into()))?;

        let answer = match question {
            Question::Rotation => script.rotation,
            Question::Caption => {
                tokio::time::sleep(script.caption_delay).await;
                self.recorder.item_finished();
                script.caption
            }
        };

        self.recorder.push(Event::Answered { item, question });
        Ok(answer)
    }
}

/// 临时工作目录：输入图片 + 输出目录
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    /// 写一张只有 JPEG 文件头的图片
    pub fn image(&self, name: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, [0xff, 0xd8, 0xff, 0xe0, 0x00, 0x10, 0x4a, 0x46]).unwrap();
        path
    }

    pub fn images(&self, count: usize) -> Vec<PathBuf> {
        (1..=count).map(|i| self.image(&format!("img{}.jpg", i))).collect()
    }

    pub fn text_file(&self, name: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, "not an image at all").unwrap();
        path
    }

    pub fn output_dir(&self) -> PathBuf {
        self.dir.path().join("out")
    }

    pub fn config(&self, cap: usize) -> Config {
        Config {
            max_concurrent_items: cap,
            output_dir: self.output_dir(),
            token_poll_interval_ms: 5,
            ..Config::default()
        }
    }

    pub fn report(&self) -> String {
        std::fs::read_to_string(self.output_dir().join("index.html")).unwrap()
    }
}

/// 期望的页面内容：每张图片一个链接块紧跟一个标题块
pub fn expected_report(entries: &[(&str, &str)]) -> String {
    entries
        .iter()
        .map(|(name, caption)| {
            format!(
                "<a href=\"med_{name}\"><img src=\"thumb_{name}\"></a><h2>{caption}</h2>"
            )
        })
        .collect()
}
