// crates/hf_physics/src/domain.rs

//! 域布局与流动映射
//!
//! 本模块是几何/分区服务（外部协作者）与引擎之间的适配层：
//! 分区器产出纯数据 [`DomainLayout`]，引擎通过 [`FlowDomain::new`]
//! 接管并在接管时一次性校验全部尺寸/越界不变量，此后热循环内
//! 不再出现 `Result`。
//!
//! # 站点排序不变量
//!
//! 站点按 `[inner: 六类依次][inter: 六类依次]` 连续分区存放。
//! inner 站点的流动目标全部落在本进程；inter 站点至少有一个方向
//! 跨进程（指向共享 halo 槽位）。各分区偏移精确铺满站点总数，
//! 无重叠、无缝隙。
//!
//! # 壁面反弹
//!
//! 反弹（bounce-back）由分区器编码进流动映射：指向固体的方向，
//! 其 [`StreamTarget`] 即本站点反方向槽位。六类碰撞因此共享同一个
//! 单态流动内循环。

use serde::{Deserialize, Serialize};

use hf_foundation::{ensure, HfError, HfResult};

use crate::lattice::NUM_VECTORS;
use crate::state::PopulationField;
use crate::types::CollisionKind;

// ============================================================
// 流动目标
// ============================================================

/// 单个 (站点, 方向) 的流动目的地
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreamTarget {
    /// 本进程 "new" 缓冲中的槽位（`site × 15 + direction` 扁平下标）
    Local(usize),
    /// 出站 halo 共享槽位（由传输层送往邻居进程）
    Shared(usize),
}

/// 站点分区的本地性
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locality {
    /// 无跨进程依赖
    Inner,
    /// 流动目标跨进程
    Inter,
}

// ============================================================
// 域布局（分区器产出的纯数据）
// ============================================================

/// 域布局
///
/// 由外部几何/分区服务构建的纯数据描述；
/// 字段公开，校验在 [`FlowDomain::new`] 接管时进行。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainLayout {
    /// 本地站点总数
    pub site_count: usize,
    /// 六类 inner 分区的站点数（按 [`CollisionKind::ALL`] 顺序）
    pub inner_counts: [usize; CollisionKind::COUNT],
    /// 六类 inter 分区的站点数
    pub inter_counts: [usize; CollisionKind::COUNT],
    /// 每 (站点 × 方向) 的流动目标，长度 `site_count × 15`
    pub stream_targets: Vec<StreamTarget>,
    /// 每站点的边界区域 id，长度 `site_count`；仅进/出口类分区有意义
    pub boundary_ids: Vec<u32>,
    /// halo 共享槽位总数
    pub shared_count: usize,
}

impl DomainLayout {
    /// inner 站点总数
    #[inline]
    pub fn inner_site_count(&self) -> usize {
        self.inner_counts.iter().sum()
    }

    /// inter 站点总数
    #[inline]
    pub fn inter_site_count(&self) -> usize {
        self.inter_counts.iter().sum()
    }

    /// 指定本地性下某分类的站点数
    #[inline]
    pub fn partition_count(&self, locality: Locality, kind: CollisionKind) -> usize {
        match locality {
            Locality::Inner => self.inner_counts[kind.index()],
            Locality::Inter => self.inter_counts[kind.index()],
        }
    }

    /// 指定分区的半开站点区间
    ///
    /// inner 分区从 0 起依次排列，inter 分区从 inner 总数起依次排列。
    pub fn partition_range(&self, locality: Locality, kind: CollisionKind) -> std::ops::Range<usize> {
        let k = kind.index();
        let (counts, base) = match locality {
            Locality::Inner => (&self.inner_counts, 0),
            Locality::Inter => (&self.inter_counts, self.inner_site_count()),
        };
        let offset = base + counts[..k].iter().sum::<usize>();
        offset..offset + counts[k]
    }

    /// 校验布局自洽性
    pub fn validate(&self) -> HfResult<()> {
        HfError::check_size(
            "stream_targets",
            self.site_count * NUM_VECTORS,
            self.stream_targets.len(),
        )?;
        HfError::check_size("boundary_ids", self.site_count, self.boundary_ids.len())?;

        let partitioned = self.inner_site_count() + self.inter_site_count();
        ensure!(
            partitioned == self.site_count,
            HfError::invalid_layout(format!(
                "分区站点数 {partitioned} 与站点总数 {} 不符",
                self.site_count
            ))
        );

        let local_slots = self.site_count * NUM_VECTORS;
        for (i, target) in self.stream_targets.iter().enumerate() {
            match *target {
                StreamTarget::Local(index) => {
                    HfError::check_index("stream_target.local", index, local_slots)?;
                }
                StreamTarget::Shared(slot) => {
                    HfError::check_index("stream_target.shared", slot, self.shared_count)?;
                    // inner 站点不得携带跨进程目标
                    let site = i / NUM_VECTORS;
                    ensure!(
                        site >= self.inner_site_count(),
                        HfError::invalid_layout(format!(
                            "inner 站点 {site} 携带跨进程流动目标"
                        ))
                    );
                }
            }
        }

        Ok(())
    }
}

// ============================================================
// 共享面翻译表
// ============================================================

/// 共享面翻译表
///
/// 将接收到的 halo 槽位下标映射到 "new" 缓冲中的目的下标；
/// 建立一次，之后只读。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedFaceMap {
    destinations: Vec<usize>,
}

impl SharedFaceMap {
    /// 由目的下标序列构建
    pub fn new(destinations: Vec<usize>) -> Self {
        Self { destinations }
    }

    /// 无共享面（单进程运行）
    pub fn empty() -> Self {
        Self {
            destinations: Vec::new(),
        }
    }

    /// 槽位数
    #[inline]
    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    /// 是否为空
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }

    /// 槽位的目的下标
    #[inline]
    pub fn destination(&self, slot: usize) -> usize {
        self.destinations[slot]
    }

    /// 校验表与布局的一致性
    pub fn validate(&self, layout: &DomainLayout) -> HfResult<()> {
        HfError::check_size("shared_face_map", layout.shared_count, self.len())?;
        let local_slots = layout.site_count * NUM_VECTORS;
        for &dest in &self.destinations {
            HfError::check_index("shared_face_map.destination", dest, local_slots)?;
        }
        Ok(())
    }
}

// ============================================================
// 流动域（布局 + 布居数组）
// ============================================================

/// 流动域：已校验的布局与其双缓冲布居数组
#[derive(Debug, Clone)]
pub struct FlowDomain {
    layout: DomainLayout,
    field: PopulationField,
}

impl FlowDomain {
    /// 接管布局并分配布居数组；布局不自洽时报错
    pub fn new(layout: DomainLayout) -> HfResult<Self> {
        layout.validate()?;
        let field = PopulationField::new(layout.site_count, layout.shared_count);
        Ok(Self { layout, field })
    }

    /// 布局
    #[inline]
    pub fn layout(&self) -> &DomainLayout {
        &self.layout
    }

    /// 布居数组
    #[inline]
    pub fn field(&self) -> &PopulationField {
        &self.field
    }

    /// 布居数组（可写）
    #[inline]
    pub fn field_mut(&mut self) -> &mut PopulationField {
        &mut self.field
    }

    /// 同时借出布局与可写布居数组
    #[inline]
    pub fn parts_mut(&mut self) -> (&DomainLayout, &mut PopulationField) {
        (&self.layout, &mut self.field)
    }
}

// ============================================================
// 测试
// ============================================================
