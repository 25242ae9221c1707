// crates/hf_physics/src/collision.rs

//! 碰撞规则
//!
//! 六种站点分类映射到四条逐站点碰撞规则（进口与出口共用
//! 边界密度规则，仅边界族不同）：
//!
//! | 分类 | 规则 |
//! |---|---|
//! | mid-fluid | [`bgk_relax`]：标准 BGK 松弛 |
//! | wall | [`zero_velocity_equilibrium`]：本站密度、零速度平衡 |
//! | inlet / outlet | [`boundary_density_equilibrium`]：边界密度、本站动量平衡 |
//! | inlet-wall / outlet-wall | [`zero_velocity_boundary_density`]：边界密度、零速度平衡 |
//!
//! 每条规则只计算碰撞后的分布，流动路由交给遍历层按流动映射
//! 统一完成（壁面反弹已编码在映射中）。

use glam::DVec3;

use crate::lattice::{self, NUM_VECTORS};
use crate::types::LbmParameters;

/// 单个站点的碰撞结果
#[derive(Debug, Clone, Copy)]
pub struct SiteUpdate {
    /// 站点密度（零阶矩）
    pub density: f64,
    /// 站点动量（一阶矩）
    pub momentum: DVec3,
    /// 碰撞后分布（待流动）
    pub f_star: [f64; NUM_VECTORS],
    /// 本次碰撞使用的平衡分布（渲染应力估算用）
    pub f_eq: [f64; NUM_VECTORS],
}

/// 体相流体：BGK 松弛 `f* = f + ω(f − feq)`
#[inline]
pub fn bgk_relax(params: &LbmParameters, f: &[f64]) -> SiteUpdate {
    let (density, momentum, f_eq) = lattice::calculate_density_momentum_feq(f);

    let mut f_star = [0.0; NUM_VECTORS];
    for dir in 0..NUM_VECTORS {
        f_star[dir] = f[dir] + params.omega * (f[dir] - f_eq[dir]);
    }

    SiteUpdate {
        density,
        momentum,
        f_star,
        f_eq,
    }
}

/// 壁面：以本站密度、零速度的平衡分布整体替换
#[inline]
pub fn zero_velocity_equilibrium(f: &[f64]) -> SiteUpdate {
    let (density, momentum) = lattice::calculate_density_and_momentum(f);
    let f_eq = lattice::calculate_feq(density, DVec3::ZERO);

    SiteUpdate {
        density,
        momentum,
        f_star: f_eq,
        f_eq,
    }
}

/// 进/出口：平衡目标使用边界施加密度与本站动量（非零速度形式）
#[inline]
pub fn boundary_density_equilibrium(applied_density: f64, f: &[f64]) -> SiteUpdate {
    let (_, momentum) = lattice::calculate_density_and_momentum(f);
    let f_eq = lattice::calculate_feq(applied_density, momentum);

    SiteUpdate {
        density: applied_density,
        momentum,
        f_star: f_eq,
        f_eq,
    }
}

/// 进/出口兼壁面：边界施加密度、零速度平衡
#[inline]
pub fn zero_velocity_boundary_density(applied_density: f64, f: &[f64]) -> SiteUpdate {
    let f_eq = lattice::calculate_feq(applied_density, DVec3::ZERO);

    SiteUpdate {
        density: applied_density,
        momentum: DVec3::ZERO,
        f_star: f_eq,
        f_eq,
    }
}

// ============================================================
// 测试
// ============================================================
