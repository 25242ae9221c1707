// crates/hf_physics/src/topology.rs

//! 进程拓扑上下文
//!
//! 进程拓扑发现服务（外部协作者）在启动时构建一次
//! [`TopologyContext`]，之后显式传入需要邻居信息的组件：
//! 没有全局单例，没有隐藏可变状态。

use serde::{Deserialize, Serialize};

use hf_foundation::{ensure, HfError, HfResult};

use crate::domain::DomainLayout;

/// 进程号
pub type Rank = usize;

/// 邻居进程描述
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neighbour {
    /// 邻居进程号
    pub rank: Rank,
    /// 与该邻居共享的布居数
    pub shared_count: usize,
    /// 该邻居的共享数据在共享区内的起始偏移
    pub first_shared_offset: usize,
}

/// 进程拓扑上下文
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyContext {
    /// 本进程号
    pub local_rank: Rank,
    /// 邻居进程列表（共享区偏移递增）
    pub neighbours: Vec<Neighbour>,
}

impl TopologyContext {
    /// 单进程拓扑（无邻居）
    pub fn single_process() -> Self {
        Self {
            local_rank: 0,
            neighbours: Vec::new(),
        }
    }

    /// 全部邻居的共享布居总数
    #[inline]
    pub fn total_shared_count(&self) -> usize {
        self.neighbours.iter().map(|n| n.shared_count).sum()
    }

    /// 校验拓扑与域布局的一致性
    ///
    /// 各邻居的共享区间必须依次铺满 `[0, layout.shared_count)`。
    pub fn validate(&self, layout: &DomainLayout) -> HfResult<()> {
        HfError::check_size(
            "topology.shared_count",
            layout.shared_count,
            self.total_shared_count(),
        )?;

        let mut expected_offset = 0;
        for neighbour in &self.neighbours {
            ensure!(
                neighbour.rank != self.local_rank,
                HfError::invalid_layout(format!("进程 {} 不能是自己的邻居", neighbour.rank))
            );
            ensure!(
                neighbour.first_shared_offset == expected_offset,
                HfError::invalid_layout(format!(
                    "邻居 {} 的共享偏移 {} 与期望 {expected_offset} 不符",
                    neighbour.rank, neighbour.first_shared_offset
                ))
            );
            expected_offset += neighbour.shared_count;
        }

        Ok(())
    }
}

// ============================================================
// 测试
// ============================================================
