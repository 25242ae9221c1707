// crates/hf_physics/src/sweep.rs

//! 流动/访问者分发层
//!
//! 把一种访问者行为（流动-碰撞，或 post-step 收尾）施加到某个
//! 碰撞分类分区的半开站点区间上。分类在进入分区时解析一次，
//! 随后的内循环单态，热循环内没有逐站点的分类分支。
//!
//! # 分发顺序
//!
//! 每个时间步内六类分区按固定顺序（mid-fluid、wall、inlet、
//! outlet、inlet-wall、outlet-wall）被访问；先 inner 后 inter
//! （由引擎各阶段决定），偏移连续累积，每个站点每阶段恰好被
//! 访问一次。
//!
//! # 渲染统计
//!
//! 渲染开启时同一次遍历顺带累积密度极值、速度与 von Mises
//! 应力峰值，避免第二次全场扫描。

use std::ops::Range;

use crate::boundary::BoundaryValues;
use crate::collision::{self, SiteUpdate};
use crate::domain::{DomainLayout, StreamTarget};
use crate::lattice::{self, NUM_VECTORS};
use crate::state::PopulationField;
use crate::types::{BoundaryFamily, CollisionKind, LbmParameters};
use crate::vis::RenderStats;

/// 流动-碰撞遍历的共享上下文
pub struct SweepContext<'a> {
    /// 松弛参数
    pub params: &'a LbmParameters,
    /// 边界区域表（施加密度已按当前相位刷新）
    pub boundary: &'a BoundaryValues,
    /// 本步是否在渲染
    pub rendering: bool,
    /// 渲染统计累积器
    pub render: &'a mut RenderStats,
}

// ============================================================
// 流动-碰撞
// ============================================================

/// 对一个分区执行流动-碰撞
///
/// 读 "old"、经分类对应的碰撞规则得到 `f*`，按流动映射写入
/// "new"（本地目标直接落位，跨进程目标写入出站 halo 槽位）。
pub fn stream_and_collide(
    kind: CollisionKind,
    range: Range<usize>,
    layout: &DomainLayout,
    field: &mut PopulationField,
    ctx: &mut SweepContext<'_>,
) {
    let shared_base = field.shared_base();
    let (old, new) = field.buffers_mut();

    match kind {
        CollisionKind::MidFluid => {
            for site in range {
                let base = site * NUM_VECTORS;
                let f = &old[base..base + NUM_VECTORS];
                let update = collision::bgk_relax(ctx.params, f);
                scatter(&layout.stream_targets, new, shared_base, base, &update.f_star);
                if ctx.rendering {
                    sample(ctx, f, &update);
                }
            }
        }
        CollisionKind::Wall => {
            for site in range {
                let base = site * NUM_VECTORS;
                let f = &old[base..base + NUM_VECTORS];
                let update = collision::zero_velocity_equilibrium(f);
                scatter(&layout.stream_targets, new, shared_base, base, &update.f_star);
                if ctx.rendering {
                    sample(ctx, f, &update);
                }
            }
        }
        CollisionKind::Inlet => {
            boundary_sweep(BoundaryFamily::Inlet, range, layout, old, new, shared_base, ctx);
        }
        CollisionKind::Outlet => {
            boundary_sweep(BoundaryFamily::Outlet, range, layout, old, new, shared_base, ctx);
        }
        CollisionKind::InletWall => {
            boundary_wall_sweep(BoundaryFamily::Inlet, range, layout, old, new, shared_base, ctx);
        }
        CollisionKind::OutletWall => {
            boundary_wall_sweep(BoundaryFamily::Outlet, range, layout, old, new, shared_base, ctx);
        }
    }
}

/// 进/出口分区：边界密度、保留动量
#[allow(clippy::too_many_arguments)]
fn boundary_sweep(
    family: BoundaryFamily,
    range: Range<usize>,
    layout: &DomainLayout,
    old: &[f64],
    new: &mut [f64],
    shared_base: usize,
    ctx: &mut SweepContext<'_>,
) {
    for site in range {
        let base = site * NUM_VECTORS;
        let f = &old[base..base + NUM_VECTORS];
        let region = layout.boundary_ids[site] as usize;
        let applied = ctx.boundary.applied(family, region);
        let update = collision::boundary_density_equilibrium(applied, f);
        scatter(&layout.stream_targets, new, shared_base, base, &update.f_star);
        if ctx.rendering {
            sample(ctx, f, &update);
        }
    }
}

/// 进/出口兼壁面分区：边界密度、零速度
#[allow(clippy::too_many_arguments)]
fn boundary_wall_sweep(
    family: BoundaryFamily,
    range: Range<usize>,
    layout: &DomainLayout,
    old: &[f64],
    new: &mut [f64],
    shared_base: usize,
    ctx: &mut SweepContext<'_>,
) {
    for site in range {
        let base = site * NUM_VECTORS;
        let f = &old[base..base + NUM_VECTORS];
        let region = layout.boundary_ids[site] as usize;
        let applied = ctx.boundary.applied(family, region);
        let update = collision::zero_velocity_boundary_density(applied, f);
        scatter(&layout.stream_targets, new, shared_base, base, &update.f_star);
        if ctx.rendering {
            sample(ctx, f, &update);
        }
    }
}

/// 按流动映射把 `f*` 写入 "new"
#[inline]
fn scatter(
    targets: &[StreamTarget],
    new: &mut [f64],
    shared_base: usize,
    base: usize,
    f_star: &[f64; NUM_VECTORS],
) {
    for dir in 0..NUM_VECTORS {
        match targets[base + dir] {
            StreamTarget::Local(index) => new[index] = f_star[dir],
            StreamTarget::Shared(slot) => new[shared_base + slot] = f_star[dir],
        }
    }
}

/// 渲染统计采样
#[inline]
fn sample(ctx: &mut SweepContext<'_>, f: &[f64], update: &SiteUpdate) {
    let mut f_neq = [0.0; NUM_VECTORS];
    for dir in 0..NUM_VECTORS {
        f_neq[dir] = f[dir] - update.f_eq[dir];
    }
    let stress = lattice::calculate_von_mises_stress(&f_neq, ctx.params.stress_parameter);
    let velocity = update.momentum.length() / update.density;
    ctx.render.record(update.density, velocity, stress);
}

// ============================================================
// Post-step
// ============================================================

/// 对一个分区执行 post-step 收尾
///
/// 全部布居（本地与接收）落定之后运行。进/出口类分区做边界
/// 簿记：按 "new" 布居采样区域实测密度；体相与纯壁面分区无
/// 收尾工作。
pub fn post_step(
    kind: CollisionKind,
    range: Range<usize>,
    layout: &DomainLayout,
    field: &PopulationField,
    boundary: &mut BoundaryValues,
) {
    let family = match kind.boundary_family() {
        Some(family) => family,
        None => return,
    };

    for site in range {
        let (density, _) = lattice::calculate_density_and_momentum(field.new_site(site));
        let region = layout.boundary_ids[site] as usize;
        boundary.record_sample(family, region, density);
    }
}

// ============================================================
// 测试
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::BoundaryRegion;
    use crate::lattice::INVERSE_DIRECTIONS;
    use crate::types::PhysicalProperties;
    use approx::assert_relative_eq;
    use glam::DVec3;

    fn params() -> LbmParameters {
        LbmParameters::derive(&PhysicalProperties::default(), 1000)
    }

    fn boundary_values() -> BoundaryValues {
        let inlet = BoundaryRegion {
            mean_density: 1.08,
            density_amplitude: 0.0,
            phase_offset: 0.0,
            normal: DVec3::Z,
        };
        let outlet = BoundaryRegion {
            mean_density: 0.96,
            density_amplitude: 0.0,
            phase_offset: 0.0,
            normal: -DVec3::Z,
        };
        BoundaryValues::new(vec![inlet], vec![outlet]).unwrap()
    }

    /// 单站点封闭布局：每个方向反弹回本站点反方向槽位
    fn single_site_layout(kind_index: usize) -> DomainLayout {
        let stream_targets = (0..NUM_VECTORS)
            .map(|dir| StreamTarget::Local(INVERSE_DIRECTIONS[dir]))
            .collect();
        let mut inner_counts = [0; 6];
        inner_counts[kind_index] = 1;
        DomainLayout {
            site_count: 1,
            inner_counts,
            inter_counts: [0; 6],
            stream_targets,
            boundary_ids: vec![0],
            shared_count: 0,
        }
    }

    fn seeded_field(layout: &DomainLayout, density: f64, momentum: DVec3) -> PopulationField {
        let mut field = PopulationField::new(layout.site_count, layout.shared_count);
        let f_eq = lattice::calculate_feq(density, momentum);
        field.fill_equilibrium(&f_eq, usize::MAX);
        field
    }

    #[test]
    fn test_mid_fluid_sweep_conserves_mass() {
        let layout = single_site_layout(0);
        let mut field = seeded_field(&layout, 1.02, DVec3::new(0.01, 0.0, 0.0));
        let params = params();
        let boundary = boundary_values();
        let mut render = RenderStats::default();
        let mut ctx = SweepContext {
            params: &params,
            boundary: &boundary,
            rendering: false,
            render: &mut render,
        };

        stream_and_collide(CollisionKind::MidFluid, 0..1, &layout, &mut field, &mut ctx);

        let (density, _) = lattice::calculate_density_and_momentum(field.new_site(0));
        assert_relative_eq!(density, 1.02, max_relative = 1e-12);
    }

    #[test]
    fn test_wall_sweep_reflects_through_stream_map() {
        let layout = single_site_layout(1);
        let mut field = seeded_field(&layout, 1.0, DVec3::ZERO);
        let params = params();
        let boundary = boundary_values();
        let mut render = RenderStats::default();
        let mut ctx = SweepContext {
            params: &params,
            boundary: &boundary,
            rendering: false,
            render: &mut render,
        };

        stream_and_collide(CollisionKind::Wall, 0..1, &layout, &mut field, &mut ctx);

        // 零速度平衡对称，经反弹映射后各方向值等于权重×密度
        let f_new = field.new_site(0);
        let f_eq = lattice::calculate_feq(1.0, DVec3::ZERO);
        for dir in 0..NUM_VECTORS {
            assert_relative_eq!(f_new[dir], f_eq[INVERSE_DIRECTIONS[dir]], max_relative = 1e-12);
        }
    }

    #[test]
    fn test_inlet_sweep_applies_boundary_density() {
        let layout = single_site_layout(2);
        let mut field = seeded_field(&layout, 1.0, DVec3::ZERO);
        let params = params();
        let boundary = boundary_values();
        let mut render = RenderStats::default();
        let mut ctx = SweepContext {
            params: &params,
            boundary: &boundary,
            rendering: false,
            render: &mut render,
        };

        stream_and_collide(CollisionKind::Inlet, 0..1, &layout, &mut field, &mut ctx);

        let (density, _) = lattice::calculate_density_and_momentum(field.new_site(0));
        assert_relative_eq!(density, 1.08, max_relative = 1e-12);
    }

    #[test]
    fn test_outlet_wall_sweep_zero_velocity() {
        let layout = single_site_layout(5);
        let mut field = seeded_field(&layout, 1.0, DVec3::new(0.02, 0.0, 0.01));
        let params = params();
        let boundary = boundary_values();
        let mut render = RenderStats::default();
        let mut ctx = SweepContext {
            params: &params,
            boundary: &boundary,
            rendering: false,
            render: &mut render,
        };

        stream_and_collide(CollisionKind::OutletWall, 0..1, &layout, &mut field, &mut ctx);

        let (density, momentum) = lattice::calculate_density_and_momentum(field.new_site(0));
        assert_relative_eq!(density, 0.96, max_relative = 1e-12);
        assert!(momentum.length() < 1e-14);
    }

    #[test]
    fn test_rendering_accumulates_stats() {
        let layout = single_site_layout(0);
        let mut field = seeded_field(&layout, 1.02, DVec3::new(0.01, 0.0, 0.0));
        let params = params();
        let boundary = boundary_values();
        let mut render = RenderStats::default();
        let mut ctx = SweepContext {
            params: &params,
            boundary: &boundary,
            rendering: true,
            render: &mut render,
        };

        stream_and_collide(CollisionKind::MidFluid, 0..1, &layout, &mut field, &mut ctx);

        assert_eq!(render.samples, 1);
        assert_relative_eq!(render.density_max, 1.02, max_relative = 1e-12);
        // 平衡场的非平衡部分为零 → 应力为零
        assert_relative_eq!(render.stress_max, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_post_step_records_boundary_density() {
        let layout = single_site_layout(3);
        let mut field = seeded_field(&layout, 1.0, DVec3::ZERO);
        let params = params();
        let mut boundary = boundary_values();
        {
            let mut render = RenderStats::default();
            let mut ctx = SweepContext {
                params: &params,
                boundary: &boundary,
                rendering: false,
                render: &mut render,
            };
            stream_and_collide(CollisionKind::Outlet, 0..1, &layout, &mut field, &mut ctx);
        }

        post_step(CollisionKind::Outlet, 0..1, &layout, &field, &mut boundary);

        let mean = boundary.sampling(BoundaryFamily::Outlet).mean(0).unwrap();
        assert_relative_eq!(mean, 0.96, max_relative = 1e-12);
    }

    #[test]
    fn test_post_step_noop_for_mid_fluid() {
        let layout = single_site_layout(0);
        let field = seeded_field(&layout, 1.0, DVec3::ZERO);
        let mut boundary = boundary_values();

        post_step(CollisionKind::MidFluid, 0..1, &layout, &field, &mut boundary);

        assert!(boundary.sampling(BoundaryFamily::Inlet).mean(0).is_none());
        assert!(boundary.sampling(BoundaryFamily::Outlet).mean(0).is_none());
    }
}
