// crates/hf_physics/src/types.rs

//! 核心类型定义
//!
//! - [`CollisionKind`]: 六种站点碰撞分类（标签枚举，按分区整体分发）
//! - [`BoundaryFamily`]: 进口/出口边界族
//! - [`PhysicalProperties`]: 物理常数（SI 单位）
//! - [`LbmParameters`]: 由物理常数确定性导出的松弛参数块

use serde::{Deserialize, Serialize};

use hf_config::SimulationConfig;

/// 格子声速平方 Cs²
pub const CS2: f64 = 1.0 / 3.0;

// ============================================================
// 碰撞分类
// ============================================================

/// 站点碰撞分类
///
/// 分区按固定顺序连续存放（先 inner 后 inter），
/// 分类在每个连续分区上解析一次，内循环单态、无逐站点分支。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollisionKind {
    /// 体相流体
    MidFluid,
    /// 壁面
    Wall,
    /// 入口
    Inlet,
    /// 出口
    Outlet,
    /// 入口兼壁面
    InletWall,
    /// 出口兼壁面
    OutletWall,
}

impl CollisionKind {
    /// 分类数量
    pub const COUNT: usize = 6;

    /// 固定遍历顺序
    pub const ALL: [CollisionKind; Self::COUNT] = [
        CollisionKind::MidFluid,
        CollisionKind::Wall,
        CollisionKind::Inlet,
        CollisionKind::Outlet,
        CollisionKind::InletWall,
        CollisionKind::OutletWall,
    ];

    /// 按索引解析分类；0–5 之外返回 None
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// 分类在固定顺序中的索引
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Self::MidFluid => 0,
            Self::Wall => 1,
            Self::Inlet => 2,
            Self::Outlet => 3,
            Self::InletWall => 4,
            Self::OutletWall => 5,
        }
    }

    /// 所属边界族（仅进/出口类分类有值）
    #[inline]
    pub fn boundary_family(self) -> Option<BoundaryFamily> {
        match self {
            Self::Inlet | Self::InletWall => Some(BoundaryFamily::Inlet),
            Self::Outlet | Self::OutletWall => Some(BoundaryFamily::Outlet),
            Self::MidFluid | Self::Wall => None,
        }
    }

    /// 是否兼具壁面行为
    #[inline]
    pub fn is_wall_bounded(self) -> bool {
        matches!(self, Self::Wall | Self::InletWall | Self::OutletWall)
    }
}

impl std::fmt::Display for CollisionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MidFluid => write!(f, "mid-fluid"),
            Self::Wall => write!(f, "wall"),
            Self::Inlet => write!(f, "inlet"),
            Self::Outlet => write!(f, "outlet"),
            Self::InletWall => write!(f, "inlet-wall"),
            Self::OutletWall => write!(f, "outlet-wall"),
        }
    }
}

/// 边界族：入口或出口
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoundaryFamily {
    /// 入口
    Inlet,
    /// 出口
    Outlet,
}

impl std::fmt::Display for BoundaryFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Inlet => write!(f, "inlet"),
            Self::Outlet => write!(f, "outlet"),
        }
    }
}

// ============================================================
// 物理常数与松弛参数
// ============================================================

/// 物理常数（SI 单位）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicalProperties {
    /// 动力黏度 [Pa·s]
    pub viscosity_pa_s: f64,
    /// 流体密度 [kg/m³]
    pub density_kg_m3: f64,
    /// 体素边长 [m]
    pub voxel_size_m: f64,
    /// 脉动周期 [s]
    pub pulsatile_period_s: f64,
}

impl PhysicalProperties {
    /// 从配置提取物理常数
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            viscosity_pa_s: config.fluid.viscosity_pa_s,
            density_kg_m3: config.fluid.density_kg_m3,
            voxel_size_m: config.lattice.voxel_size_m,
            pulsatile_period_s: config.lattice.pulsatile_period_s,
        }
    }
}

impl Default for PhysicalProperties {
    fn default() -> Self {
        Self::from_config(&SimulationConfig::default())
    }
}

/// 松弛参数块
///
/// 全部由物理常数、周期步数和体素尺寸确定性导出；
/// 除失稳 Reset 触发的整体重算外在一次运行内不变。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LbmParameters {
    /// 松弛时间 τ
    pub tau: f64,
    /// 松弛频率 ω = −1/τ
    pub omega: f64,
    /// 应力估算系数 (1 − 1/2τ)/√2
    pub stress_parameter: f64,
    /// β = −1/2τ
    pub beta: f64,
}

impl LbmParameters {
    /// 由物理常数导出松弛参数
    ///
    /// τ = 0.5 + (T·μ/ρ) / (Cs²·N·Δx²)，N 为每周期步数。
    pub fn derive(properties: &PhysicalProperties, steps_per_cycle: u64) -> Self {
        let kinematic = properties.viscosity_pa_s / properties.density_kg_m3;
        let dx2 = properties.voxel_size_m * properties.voxel_size_m;

        let tau = 0.5
            + (properties.pulsatile_period_s * kinematic)
                / (CS2 * steps_per_cycle as f64 * dx2);

        Self {
            tau,
            omega: -1.0 / tau,
            stress_parameter: (1.0 - 1.0 / (2.0 * tau)) / std::f64::consts::SQRT_2,
            beta: -1.0 / (2.0 * tau),
        }
    }
}

// ============================================================
// 测试
// ============================================================
