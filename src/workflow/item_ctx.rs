//! 图片处理上下文
//!
//! 封装"我正在处理第几张图片、从谁那里等 gate、把 gate 交给谁"这一信息

use tokio::sync::oneshot;

use crate::error::CoordinationError;
use crate::models::Item;

/// 等待前驱的 gate 信号
#[derive(Debug)]
pub struct GateIn {
    index: usize,
    rx: oneshot::Receiver<()>,
}

impl GateIn {
    /// 阻塞直到前驱发出信号
    ///
    /// 前驱没有发信号就退出时返回 `GateClosed`
    pub async fn wait(self) -> Result<(), CoordinationError> {
        self.rx
            .await
            .map_err(|_| CoordinationError::GateClosed { index: self.index })
    }
}

/// 通知后继可以显示
#[derive(Debug)]
pub struct GateOut {
    tx: oneshot::Sender<()>,
}

impl GateOut {
    /// 后继已经退出时返回 false
    pub fn open(self) -> bool {
        self.tx.send(()).is_ok()
    }
}

/// 为 `count` 张图片创建相邻两两之间的 gate
///
/// 第 i 个元素是第 i+1 张图片的 (等待端, 通知端)；
/// 第 1 张图片没有等待端，最后一张没有通知端
pub fn gate_chain(count: usize) -> Vec<(Option<GateIn>, Option<GateOut>)> {
    let mut chain: Vec<(Option<GateIn>, Option<GateOut>)> =
        (0..count).map(|_| (None, None)).collect();

    for successor in 1..count {
        let (tx, rx) = oneshot::channel();
        chain[successor - 1].1 = Some(GateOut { tx });
        chain[successor].0 = Some(GateIn {
            index: successor + 1,
            rx,
        });
    }

    chain
}

/// 图片处理上下文
///
/// 包含处理单张图片所需的所有信息，由所属 worker 独占
#[derive(Debug)]
pub struct ItemCtx {
    /// 图片本身
    pub item: Item,
    /// 前驱的 gate（第 1 张图片为 None）
    pub gate_in: Option<GateIn>,
    /// 交给后继的 gate（最后一张图片为 None）
    pub gate_out: Option<GateOut>,
}

impl ItemCtx {
    /// 创建新的图片处理上下文
    pub fn new(item: Item, gate_in: Option<GateIn>, gate_out: Option<GateOut>) -> Self {
        Self {
            item,
            gate_in,
            gate_out,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_links_neighbours_only() {
        let chain = gate_chain(3);
        assert!(chain[0].0.is_none() && chain[0].1.is_some());
        assert!(chain[1].0.is_some() && chain[1].1.is_some());
        assert!(chain[2].0.is_some() && chain[2].1.is_none());

        let single = gate_chain(1);
        assert!(single[0].0.is_none() && single[0].1.is_none());
    }

    #[tokio::test]
    async fn dropped_predecessor_closes_the_gate() {
        let mut chain = gate_chain(2);
        let (gate_in, _) = chain.pop().unwrap();
        drop(chain);

        let err = gate_in.unwrap().wait().await.unwrap_err();
        assert!(matches!(err, CoordinationError::GateClosed { index: 2 }));
    }

    #[tokio::test]
    async fn opened_gate_is_observed() {
        let mut chain = gate_chain(2);
        let (gate_in, _) = chain.pop().unwrap();
        let (_, gate_out) = chain.pop().unwrap();

        assert!(gate_out.unwrap().open());
        gate_in.unwrap().wait().await.unwrap();
    }
}
