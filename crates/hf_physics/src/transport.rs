// crates/hf_physics/src/transport.rs

//! 点对点传输原语
//!
//! 引擎消费的传输接口（外部协作者）：按进程号投递非阻塞的类型化
//! 发送/接收请求，在显式等待点完成。每对 (源, 目的) 之间的消息
//! 假定可靠且保序。
//!
//! # 失败语义
//!
//! 通信失败对模拟是致命的：错误一路向上传播，由最外层中止进程。
//! 不存在重试、超时或取消。通信伙伴在启动时固定，缺失的对端
//! 会使整个运行停摆（这是正确性假设而非防御目标）。
//!
//! # 参考实现
//!
//! [`MemoryTransport`] 通过进程内消息枢纽 [`MessageHub`] 实现该
//! 接口，用于单机多域运行与测试。

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;

use crate::topology::Rank;

// ============================================================
// 错误
// ============================================================

/// 传输层错误（致命，不重试）
#[derive(Error, Debug)]
pub enum TransportError {
    /// 等待点没有等到期望的消息
    #[error("通信失败: 进程 {to} 未收到来自进程 {from} 的消息")]
    MissingMessage {
        /// 源进程
        from: Rank,
        /// 目的进程
        to: Rank,
    },

    /// 消息长度与投递的接收请求不符
    #[error("通信失败: 来自进程 {from} 的消息长度 {actual} 与期望 {expected} 不符")]
    LengthMismatch {
        /// 源进程
        from: Rank,
        /// 期望长度
        expected: usize,
        /// 实际长度
        actual: usize,
    },

    /// 没有已完成、可取出的接收
    #[error("通信失败: 没有来自进程 {from} 的已完成接收")]
    NothingReceived {
        /// 源进程
        from: Rank,
    },
}

/// 传输层结果类型
pub type TransportResult<T> = Result<T, TransportError>;

// ============================================================
// 传输接口
// ============================================================

/// 非阻塞点对点传输原语
pub trait Transport {
    /// 投递一次非阻塞发送
    fn post_send(&mut self, to: Rank, data: &[f64]) -> TransportResult<()>;

    /// 投递一次非阻塞接收（期望 `count` 个标量）
    fn post_receive(&mut self, from: Rank, count: usize) -> TransportResult<()>;

    /// 阻塞直到全部在途发送完成
    fn wait_sends(&mut self) -> TransportResult<()>;

    /// 阻塞直到全部在途发送与接收完成
    ///
    /// 完成后已投递的接收可通过 [`Transport::drain_received`] 取出。
    fn wait_all(&mut self) -> TransportResult<()>;

    /// 取出一条已完成的接收，拷贝进 `out`
    fn drain_received(&mut self, from: Rank, out: &mut [f64]) -> TransportResult<()>;
}

// ============================================================
// 进程内消息枢纽
// ============================================================

/// 进程内消息枢纽
///
/// 以 (源, 目的) 为键的 FIFO 队列集合，保证每对进程间保序。
#[derive(Debug, Default)]
pub struct MessageHub {
    queues: Mutex<HashMap<(Rank, Rank), VecDeque<Vec<f64>>>>,
}

impl MessageHub {
    /// 创建共享枢纽
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn push(&self, from: Rank, to: Rank, data: Vec<f64>) {
        self.queues
            .lock()
            .entry((from, to))
            .or_default()
            .push_back(data);
    }

    fn pop(&self, from: Rank, to: Rank) -> Option<Vec<f64>> {
        self.queues
            .lock()
            .get_mut(&(from, to))
            .and_then(|queue| queue.pop_front())
    }
}

/// 基于 [`MessageHub`] 的进程内传输实现
#[derive(Debug)]
pub struct MemoryTransport {
    rank: Rank,
    hub: Arc<MessageHub>,
    /// 已投递、尚未完成的接收请求
    pending_receives: Vec<(Rank, usize)>,
    /// 已完成、待取出的接收
    completed: HashMap<Rank, VecDeque<Vec<f64>>>,
}

impl MemoryTransport {
    /// 接入枢纽
    pub fn connect(hub: &Arc<MessageHub>, rank: Rank) -> Self {
        Self {
            rank,
            hub: Arc::clone(hub),
            pending_receives: Vec::new(),
            completed: HashMap::new(),
        }
    }

    /// 本进程号
    #[inline]
    pub fn rank(&self) -> Rank {
        self.rank
    }
}

impl Transport for MemoryTransport {
    fn post_send(&mut self, to: Rank, data: &[f64]) -> TransportResult<()> {
        // 缓冲语义：入队即视为在途，wait_sends 时已完成
        self.hub.push(self.rank, to, data.to_vec());
        Ok(())
    }

    fn post_receive(&mut self, from: Rank, count: usize) -> TransportResult<()> {
        self.pending_receives.push((from, count));
        Ok(())
    }

    fn wait_sends(&mut self) -> TransportResult<()> {
        Ok(())
    }

    fn wait_all(&mut self) -> TransportResult<()> {
        for (from, count) in std::mem::take(&mut self.pending_receives) {
            let message = self
                .hub
                .pop(from, self.rank)
                .ok_or(TransportError::MissingMessage {
                    from,
                    to: self.rank,
                })?;

            if message.len() != count {
                return Err(TransportError::LengthMismatch {
                    from,
                    expected: count,
                    actual: message.len(),
                });
            }

            self.completed.entry(from).or_default().push_back(message);
        }
        Ok(())
    }

    fn drain_received(&mut self, from: Rank, out: &mut [f64]) -> TransportResult<()> {
        let message = self
            .completed
            .get_mut(&from)
            .and_then(|queue| queue.pop_front())
            .ok_or(TransportError::NothingReceived { from })?;

        if message.len() != out.len() {
            return Err(TransportError::LengthMismatch {
                from,
                expected: out.len(),
                actual: message.len(),
            });
        }

        out.copy_from_slice(&message);
        Ok(())
    }
}

// ============================================================
// 测试
// ============================================================
