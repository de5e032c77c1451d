//! 用户输入 - 基础设施层
//!
//! 持有唯一的 stdin 读取器，只暴露"问一个问题、读一行回答"的能力

use async_trait::async_trait;
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader, Stdin};
use tokio::sync::Mutex;

use crate::error::CoordinationError;

/// 每张图片要问的问题
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Question {
    Rotation,
    Caption,
}

impl Question {
    pub fn message(&self) -> &'static str {
        match self {
            Question::Rotation => {
                "Rotate the photo clockwise(1), counter-clockwise(2), or not rotate at all(3)?"
            }
            Question::Caption => "What's the caption for this photo?",
        }
    }
}

/// 用户输入来源
#[async_trait]
pub trait Prompter: Send + Sync {
    /// 为 `item` 提出 `question`，返回去掉行尾换行符的一行回答
    async fn ask(&self, item: &str, question: Question) -> Result<String, CoordinationError>;
}

/// 逐行读取回答
///
/// 所有 worker 共享同一个实例，避免多个缓冲读取器互相吞掉输入。
/// 输入已经结束（读到 0 字节）时返回 `UnexpectedEof`，不会把它当成空回答
pub struct LinePrompter<R> {
    reader: Mutex<R>,
}

/// 从标准输入读取回答
pub type StdinPrompter = LinePrompter<BufReader<Stdin>>;

impl<R> LinePrompter<R> {
    pub fn from_reader(reader: R) -> Self {
        Self {
            reader: Mutex::new(reader),
        }
    }
}

impl StdinPrompter {
    pub fn new() -> Self {
        Self::from_reader(BufReader::new(tokio::io::stdin()))
    }
}

impl Default for StdinPrompter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R> Prompter for LinePrompter<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn ask(&self, _item: &str, question: Question) -> Result<String, CoordinationError> {
        let mut reader = self.reader.lock().await;

        let mut stdout = tokio::io::stdout();
        stdout
            .write_all(format!("{}: ", question.message()).as_bytes())
            .await
            .map_err(CoordinationError::Input)?;
        stdout.flush().await.map_err(CoordinationError::Input)?;

        let mut line = String::new();
        let read = reader
            .read_line(&mut line)
            .await
            .map_err(CoordinationError::Input)?;
        if read == 0 {
            return Err(CoordinationError::Input(io::ErrorKind::UnexpectedEof.into()));
        }

        Ok(strip_line_ending(line))
    }
}

/// 只去掉行尾的换行符，其他空白保持原样
pub fn strip_line_ending(mut line: String) -> String {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_only_the_newline() {
        assert_eq!(strip_line_ending("1\n".to_string()), "1");
        assert_eq!(strip_line_ending("1\r\n".to_string()), "1");
        assert_eq!(strip_line_ending(" a cat \n".to_string()), " a cat ");
        assert_eq!(strip_line_ending("no newline".to_string()), "no newline");
        assert_eq!(strip_line_ending(String::new()), "");
    }

    #[tokio::test]
    async fn closed_input_is_an_error_not_an_empty_answer() {
        let prompter = LinePrompter::from_reader(&b"1\n"[..]);

        let answer = prompter.ask("a.jpg", Question::Rotation).await.unwrap();
        assert_eq!(answer, "1");

        let err = prompter.ask("a.jpg", Question::Caption).await.unwrap_err();
        match err {
            CoordinationError::Input(e) => assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn blank_line_is_still_an_answer() {
        let prompter = LinePrompter::from_reader(&b"\n"[..]);
        assert_eq!(prompter.ask("a.jpg", Question::Caption).await.unwrap(), "");
    }
}
