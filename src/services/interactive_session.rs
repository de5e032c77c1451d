//! 交互会话 - 业务能力层
//!
//! 每张图片问两个问题：是否旋转、标题是什么。
//!
//! 会话打开时启动一个辅助任务，辅助任务负责真正等待用户输入；
//! 调用方通过私有的双向通道决定"什么时候问下一个问题"：
//! 显示结束后马上问旋转，旋转完成后再问标题，中间不会重启会话。
//!
//! 状态用类型表达：`InteractiveSession::ask_rotation` 消费会话并返回
//! `PendingCaption`，后者的 `ask_caption` 问完第二个问题后关闭通道并回收辅助任务。

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::CoordinationError;
use crate::infrastructure::{Prompter, Question};
use crate::models::Rotation;

/// 一个会话最多问的问题数
const QUESTIONS_PER_SESSION: usize = 2;

/// 已打开、还没问任何问题的会话
pub struct InteractiveSession {
    channel: SessionChannel,
}

/// 已经拿到旋转方向、等待提问标题的会话
pub struct PendingCaption {
    channel: SessionChannel,
}

struct SessionChannel {
    index: usize,
    requests: mpsc::Sender<Question>,
    answers: mpsc::Receiver<String>,
    helper: JoinHandle<Result<(), CoordinationError>>,
}

impl InteractiveSession {
    /// 打开会话并启动辅助任务
    ///
    /// # 参数
    /// - `index`: 图片序号
    /// - `label`: 传给 `Prompter` 的图片名
    /// - `prompter`: 用户输入来源
    /// - `max_chars`: 回答的最大字符数，超出部分截断
    pub fn open(index: usize, label: String, prompter: Arc<dyn Prompter>, max_chars: usize) -> Self {
        let (requests, mut request_rx) = mpsc::channel::<Question>(1);
        let (answer_tx, answers) = mpsc::channel::<String>(1);

        let helper = tokio::spawn(async move {
            for _ in 0..QUESTIONS_PER_SESSION {
                // 等调用方通知再提问
                let Some(question) = request_rx.recv().await else {
                    break;
                };

                let answer = prompter.ask(&label, question).await?;
                let answer = bound_answer(index, answer, max_chars);
                debug!("[图片 {}] 用户回答 {:?}: {:?}", index, question, answer);

                if answer_tx.send(answer).await.is_err() {
                    break;
                }
            }
            Ok::<(), CoordinationError>(())
        });

        Self {
            channel: SessionChannel {
                index,
                requests,
                answers,
                helper,
            },
        }
    }

    /// 提问旋转方向
    ///
    /// 除了 "1"（顺时针）和 "2"（逆时针），其他回答都视为不旋转
    pub async fn ask_rotation(self) -> Result<(Rotation, PendingCaption), CoordinationError> {
        let (answer, channel) = self.channel.round_trip(Question::Rotation).await?;
        Ok((Rotation::from_answer(&answer), PendingCaption { channel }))
    }
}

impl PendingCaption {
    /// 提问标题，然后关闭会话
    pub async fn ask_caption(self) -> Result<String, CoordinationError> {
        let (caption, channel) = self.channel.round_trip(Question::Caption).await?;
        channel.close().await?;
        Ok(caption)
    }
}

impl SessionChannel {
    async fn round_trip(mut self, question: Question) -> Result<(String, Self), CoordinationError> {
        if self.requests.send(question).await.is_err() {
            return Err(self.failure().await);
        }

        match self.answers.recv().await {
            Some(answer) => Ok((answer, self)),
            None => Err(self.failure().await),
        }
    }

    async fn close(self) -> Result<(), CoordinationError> {
        let index = self.index;
        drop(self.requests);
        match self.helper.await {
            Ok(result) => result,
            Err(_) => Err(CoordinationError::SessionClosed { index }),
        }
    }

    /// 辅助任务提前退出时，取出它的真实错误
    async fn failure(self) -> CoordinationError {
        let index = self.index;
        drop(self.requests);
        match self.helper.await {
            Ok(Err(e)) => e,
            _ => CoordinationError::SessionClosed { index },
        }
    }
}

fn bound_answer(index: usize, answer: String, max_chars: usize) -> String {
    if answer.chars().count() <= max_chars {
        return answer;
    }
    warn!(
        "[图片 {}] ⚠️ 输入超过 {} 个字符，多余部分已丢弃",
        index, max_chars
    );
    answer.chars().take(max_chars).collect()
}
