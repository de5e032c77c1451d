//! 输出顺序控制 - token 环
//!
//! 所有 worker 共享一条通道，通道里始终最多只有一个 token，
//! token 的值就是"下一个可以写页面的图片序号"。
//!
//! - 收到的值不是自己的序号：原样放回通道，稍等后重试
//! - 收到的值是自己的序号：停止轮询，写入，然后放回 `index + 1`
//! - 第 1 张图片是初始持有者，不需要等待
//! - 最后一张图片放回的 `N + 1` 没有人消费，随通道一起丢弃

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tracing::debug;

use crate::error::CoordinationError;

/// 初始持有 token 的序号
pub const FIRST_TURN: usize = 1;

/// token 环
#[derive(Debug, Clone)]
pub struct TokenRing {
    tx: mpsc::UnboundedSender<usize>,
    rx: Arc<Mutex<mpsc::UnboundedReceiver<usize>>>,
    poll_interval: Duration,
}

impl TokenRing {
    pub fn new(poll_interval: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx: Arc::new(Mutex::new(rx)),
            poll_interval,
        }
    }

    /// 等待轮到 `index`
    pub async fn acquire(&self, index: usize) -> Result<Turn, CoordinationError> {
        if index == FIRST_TURN {
            return Ok(self.turn(index));
        }

        loop {
            let received = {
                let mut rx = self.rx.lock().await;
                rx.recv().await
            }
            .ok_or(CoordinationError::TokenRingClosed { index })?;

            debug!("[图片 {}] 收到 token {}", index, received);

            if received == index {
                return Ok(self.turn(index));
            }

            // 不是自己的轮次，原样转发
            self.tx
                .send(received)
                .map_err(|_| CoordinationError::TokenRingClosed { index })?;
            debug!("[图片 {}] 转发 token {}", index, received);

            tokio::time::sleep(self.poll_interval).await;
        }
    }

    fn turn(&self, index: usize) -> Turn {
        Turn {
            index,
            tx: self.tx.clone(),
        }
    }
}

/// 当前写入轮次
///
/// 持有期间只有自己可以写页面；`release` 把 token 交给下一个序号
#[derive(Debug)]
pub struct Turn {
    index: usize,
    tx: mpsc::UnboundedSender<usize>,
}

impl Turn {
    pub fn index(&self) -> usize {
        self.index
    }

    /// 释放轮次，放回 `index + 1`
    pub fn release(self) -> Result<(), CoordinationError> {
        let next = self.index + 1;
        debug!("[图片 {}] 发送 token {}", self.index, next);
        self.tx
            .send(next)
            .map_err(|_| CoordinationError::TokenRingClosed { index: self.index })
    }
}
