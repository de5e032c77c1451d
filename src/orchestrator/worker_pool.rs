//! 有界 worker 池 - 编排层
//!
//! 每次 spawn 之前先拿一个 Semaphore 许可，许可用完就在这里等待，
//! 所以 spawn 的顺序始终是序号递增的，而执行顺序不受限制。
//! 每个 worker 的 JoinHandle 由池持有，`join_all` 统一回收。

use futures::future::join_all;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::{AlbumError, AlbumResult};

/// 单个 worker 的结束方式
#[derive(Debug)]
pub enum WorkerOutcome<T> {
    /// 正常完成
    Completed { index: usize, value: T },
    /// 返回了错误
    Failed { index: usize, error: AlbumError },
    /// panic 或被取消
    Panicked { index: usize, message: String },
}

impl<T> WorkerOutcome<T> {
    pub fn is_completed(&self) -> bool {
        matches!(self, WorkerOutcome::Completed { .. })
    }
}

/// 有界 worker 池
pub struct WorkerPool<T> {
    cap: usize,
    semaphore: Arc<Semaphore>,
    active: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
    workers: Vec<(usize, JoinHandle<AlbumResult<T>>)>,
}

impl<T: Send + 'static> WorkerPool<T> {
    /// 创建容量为 `cap` 的池
    ///
    /// `cap` 为 0 或超过 `Semaphore::MAX_PERMITS` 时返回基础设施错误
    pub fn new(cap: usize) -> AlbumResult<Self> {
        if cap == 0 {
            return Err(AlbumError::infrastructure("最大并发数必须大于 0"));
        }
        if cap > Semaphore::MAX_PERMITS {
            return Err(AlbumError::infrastructure(format!(
                "最大并发数 {} 超过上限 {}",
                cap,
                Semaphore::MAX_PERMITS
            )));
        }

        Ok(Self {
            cap,
            semaphore: Arc::new(Semaphore::new(cap)),
            active: Arc::new(AtomicUsize::new(0)),
            peak: Arc::new(AtomicUsize::new(0)),
            workers: Vec::new(),
        })
    }

    /// 等到有空位后启动 worker
    pub async fn spawn<F>(&mut self, index: usize, worker: F) -> AlbumResult<()>
    where
        F: Future<Output = AlbumResult<T>> + Send + 'static,
    {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| AlbumError::infrastructure("worker 池已关闭"))?;

        let now_active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now_active, Ordering::SeqCst);
        debug!("[图片 {}] 加入 worker 池 (活跃 {}/{})", index, now_active, self.cap);

        let slot = ActiveSlot {
            active: self.active.clone(),
            _permit: permit,
        };

        let handle = tokio::spawn(async move {
            let _slot = slot;
            worker.await
        });
        self.workers.push((index, handle));

        Ok(())
    }

    /// 当前活跃的 worker 数量
    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// 运行期间活跃 worker 数量的最大值
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// 等待所有 worker 结束，按序号返回结果
    pub async fn join_all(self) -> Vec<WorkerOutcome<T>> {
        let (indices, handles): (Vec<_>, Vec<_>) = self.workers.into_iter().unzip();

        join_all(handles)
            .await
            .into_iter()
            .zip(indices)
            .map(|(joined, index)| match joined {
                Ok(Ok(value)) => WorkerOutcome::Completed { index, value },
                Ok(Err(error)) => WorkerOutcome::Failed { index, error },
                Err(e) => WorkerOutcome::Panicked {
                    index,
                    message: e.to_string(),
                },
            })
            .collect()
    }
}

/// worker 占用的空位，drop 时先减少计数再归还许可
struct ActiveSlot {
    active: Arc<AtomicUsize>,
    _permit: OwnedSemaphorePermit,
}

impl Drop for ActiveSlot {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}
