// crates/hf_physics/src/boundary/comms.rs

//! 边界值通信
//!
//! 参与边界的进程中选举一个 collector：它掌握完整的
//! 进程-区域映射，负责把聚合后的边界密度统计量（每区域一对
//! 平均值/振幅）扇出给其余参与进程；非 collector 进程只投递
//! 一次非阻塞接收。
//!
//! # 使用纪律
//!
//! `send_and_receive` 只投递请求；在消费缓冲或复用本对象之前
//! 必须调用 `wait_all_comms`（或先 `wait` 后 `finish_send`）。
//! 传输失败是致命的，错误向上传播。

use crate::topology::Rank;
use crate::transport::{Transport, TransportResult};

/// 边界值通信器
#[derive(Debug, Clone)]
pub struct BoundaryComms {
    /// 本进程号
    local_rank: Rank,
    /// 参与边界交换的进程（含 collector 自身）
    participants: Vec<Rank>,
    /// 本进程自身是否持有边界站点
    has_boundary: bool,
    /// 负责分发边界值的进程
    collector: Rank,
    /// 是否有一次在途接收
    awaiting_receive: bool,
    /// 在途发送数
    sends_in_flight: usize,
}

impl BoundaryComms {
    /// 创建通信器
    pub fn new(
        local_rank: Rank,
        participants: Vec<Rank>,
        has_boundary: bool,
        collector: Rank,
    ) -> Self {
        Self {
            local_rank,
            participants,
            has_boundary,
            collector,
            awaiting_receive: false,
            sends_in_flight: 0,
        }
    }

    /// 本进程是否是 collector
    #[inline]
    pub fn is_collector(&self) -> bool {
        self.local_rank == self.collector
    }

    /// 本进程是否持有边界站点
    #[inline]
    pub fn has_boundary(&self) -> bool {
        self.has_boundary
    }

    /// 发起一轮非阻塞交换
    ///
    /// collector：`values` 已装有聚合统计量，向每个其他参与者投递
    /// 一次发送；非 collector：投递一次接收，`values` 在
    /// `wait_all_comms`/`wait` 之后才有效。
    pub fn send_and_receive<T: Transport>(
        &mut self,
        transport: &mut T,
        values: &mut [f64],
    ) -> TransportResult<()> {
        if self.is_collector() {
            for &rank in &self.participants {
                if rank == self.local_rank {
                    continue;
                }
                transport.post_send(rank, values)?;
                self.sends_in_flight += 1;
            }
        } else {
            transport.post_receive(self.collector, values.len())?;
            self.awaiting_receive = true;
        }
        Ok(())
    }

    /// 等待接收侧完成并取出聚合值
    pub fn wait<T: Transport>(
        &mut self,
        transport: &mut T,
        values: &mut [f64],
    ) -> TransportResult<()> {
        if self.awaiting_receive {
            transport.wait_all()?;
            transport.drain_received(self.collector, values)?;
            self.awaiting_receive = false;
        }
        Ok(())
    }

    /// 等待本轮全部发送与接收完成
    pub fn wait_all_comms<T: Transport>(
        &mut self,
        transport: &mut T,
        values: &mut [f64],
    ) -> TransportResult<()> {
        transport.wait_all()?;
        if self.awaiting_receive {
            transport.drain_received(self.collector, values)?;
            self.awaiting_receive = false;
        }
        self.sends_in_flight = 0;
        Ok(())
    }

    /// 仅完成发送侧，允许收发两侧独立收尾
    pub fn finish_send<T: Transport>(&mut self, transport: &mut T) -> TransportResult<()> {
        transport.wait_sends()?;
        self.sends_in_flight = 0;
        Ok(())
    }
}

// ============================================================
// 测试
// ============================================================
