// crates/hf_physics/src/state.rs

//! 模拟状态管理
//!
//! - [`SimulationClock`]: 周期时钟（每周期步数、当前步、周期相位）
//! - [`PopulationField`]: 双缓冲布居数组（"old"/"new"）
//!
//! # 双缓冲纪律
//!
//! 碰撞步读 "old" 写 "new"；流动把 "new" 值写入邻居在下一步的
//! "old" 槽位（通过本步结束时的一次 swap 实现）。任意时刻恰有一个
//! 缓冲为当前、一个为暂存；每个完整时间步恰好发生一次 swap，且
//! 必须在所有跨进程数据消费完毕之后。
//!
//! # 布局
//!
//! 每个缓冲为一段连续 `Vec<f64>`：前 `site_count × 15` 个槽位按
//! `site × 15 + direction` 索引，尾部 `shared_count` 个槽位是
//! halo 共享区（"new" 侧存放待发送数据，"old" 侧接收来自邻居的数据）。

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::lattice::NUM_VECTORS;

// ============================================================
// 周期时钟
// ============================================================

/// 脉动周期时钟
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationClock {
    steps_per_cycle: u64,
    step: u64,
}

impl SimulationClock {
    /// 创建时钟
    pub fn new(steps_per_cycle: u64) -> Self {
        debug_assert!(steps_per_cycle > 0);
        Self {
            steps_per_cycle,
            step: 0,
        }
    }

    /// 每周期步数
    #[inline]
    pub fn steps_per_cycle(&self) -> u64 {
        self.steps_per_cycle
    }

    /// 已完成的时间步总数
    #[inline]
    pub fn step(&self) -> u64 {
        self.step
    }

    /// 已完成的整周期数
    #[inline]
    pub fn completed_cycles(&self) -> u64 {
        self.step / self.steps_per_cycle
    }

    /// 当前周期相位，范围 [0, 1)
    #[inline]
    pub fn cycle_phase(&self) -> f64 {
        (self.step % self.steps_per_cycle) as f64 / self.steps_per_cycle as f64
    }

    /// 推进一个时间步
    #[inline]
    pub fn advance(&mut self) {
        self.step += 1;
    }

    /// 失稳恢复：周期步数加倍并从头计步
    pub fn double_resolution(&mut self) {
        self.steps_per_cycle *= 2;
        self.step = 0;
    }
}

// ============================================================
// 双缓冲布居数组
// ============================================================

/// 双缓冲布居数组
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationField {
    site_count: usize,
    shared_count: usize,
    old: Vec<f64>,
    new: Vec<f64>,
}

impl PopulationField {
    /// 创建零初始化的布居数组
    pub fn new(site_count: usize, shared_count: usize) -> Self {
        let len = site_count * NUM_VECTORS + shared_count;
        Self {
            site_count,
            shared_count,
            old: vec![0.0; len],
            new: vec![0.0; len],
        }
    }

    /// 本地站点数
    #[inline]
    pub fn site_count(&self) -> usize {
        self.site_count
    }

    /// halo 共享槽位数
    #[inline]
    pub fn shared_count(&self) -> usize {
        self.shared_count
    }

    /// 共享区在扁平缓冲中的起始下标
    #[inline]
    pub fn shared_base(&self) -> usize {
        self.site_count * NUM_VECTORS
    }

    /// 站点在扁平缓冲中的起始下标
    #[inline]
    pub fn site_base(&self, site: usize) -> usize {
        site * NUM_VECTORS
    }

    // ========== 访问 ==========

    /// 站点的 "old" 布居（15 个）
    #[inline]
    pub fn old_site(&self, site: usize) -> &[f64] {
        let base = self.site_base(site);
        &self.old[base..base + NUM_VECTORS]
    }

    /// 站点的 "new" 布居（15 个）
    #[inline]
    pub fn new_site(&self, site: usize) -> &[f64] {
        let base = self.site_base(site);
        &self.new[base..base + NUM_VECTORS]
    }

    /// 同时借出只读 "old" 与可写 "new"（碰撞/流动步使用）
    #[inline]
    pub fn buffers_mut(&mut self) -> (&[f64], &mut [f64]) {
        (&self.old, &mut self.new)
    }

    /// "old" 缓冲整体只读视图
    #[inline]
    pub fn old_raw(&self) -> &[f64] {
        &self.old
    }

    /// "new" 缓冲共享区（待发送的出站 halo 数据）
    #[inline]
    pub fn new_shared(&self) -> &[f64] {
        let base = self.shared_base();
        &self.new[base..]
    }

    /// "old" 缓冲共享区的可写视图（接收入站 halo 数据）
    #[inline]
    pub fn old_shared_mut(&mut self) -> &mut [f64] {
        let base = self.shared_base();
        &mut self.old[base..]
    }

    /// 读 "old" 共享区单个槽位
    #[inline]
    pub fn old_shared_slot(&self, slot: usize) -> f64 {
        self.old[self.shared_base() + slot]
    }

    /// 写 "new" 缓冲单个槽位（halo 翻译拷贝使用）
    #[inline]
    pub fn set_new(&mut self, index: usize, value: f64) {
        self.new[index] = value;
    }

    // ========== 整体操作 ==========

    /// 交换 "old"/"new" 角色（每个完整时间步恰好一次）
    #[inline]
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.old, &mut self.new);
    }

    /// 将全部站点的 old/new 布居置为同一组平衡值
    ///
    /// 共享区不受影响。站点数达到 `parallel_threshold` 时并行填充。
    pub fn fill_equilibrium(&mut self, f_eq: &[f64; NUM_VECTORS], parallel_threshold: usize) {
        let site_slots = self.site_count * NUM_VECTORS;

        if self.site_count >= parallel_threshold {
            self.old[..site_slots]
                .par_chunks_mut(NUM_VECTORS)
                .for_each(|chunk| chunk.copy_from_slice(f_eq));
            self.new[..site_slots]
                .par_chunks_mut(NUM_VECTORS)
                .for_each(|chunk| chunk.copy_from_slice(f_eq));
        } else {
            for chunk in self.old[..site_slots].chunks_mut(NUM_VECTORS) {
                chunk.copy_from_slice(f_eq);
            }
            for chunk in self.new[..site_slots].chunks_mut(NUM_VECTORS) {
                chunk.copy_from_slice(f_eq);
            }
        }
    }
}

// ============================================================
// 测试
// ============================================================
