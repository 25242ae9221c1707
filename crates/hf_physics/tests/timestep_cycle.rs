// crates/hf_physics/tests/timestep_cycle.rs

//! 单进程完整时间步场景
//!
//! 用六类站点各一个的封闭小域驱动整周期，验证：
//! - 分区偏移精确铺满站点总数
//! - 无邻居时引擎仍完成完整时间步
//! - 边界簿记（post-step 区域密度采样）
//! - 渲染开启时统计量在同一遍历中累积

use approx::assert_relative_eq;
use glam::DVec3;

use hf_config::SimulationConfig;
use hf_physics::lattice::{self, INVERSE_DIRECTIONS, NUM_VECTORS};
use hf_physics::{
    BoundaryFamily, BoundaryRegion, BoundaryValues, CollisionKind, DomainLayout, LbmEngine,
    LbmEngineBuilder, Locality, MemoryTransport, MessageHub, RenderControl, StreamTarget,
};

/// 六类站点各一个的封闭布局（全部 inner，各方向反弹回本站点）
fn six_kind_layout() -> DomainLayout {
    let site_count = 6;
    let mut stream_targets = Vec::with_capacity(site_count * NUM_VECTORS);
    for site in 0..site_count {
        for dir in 0..NUM_VECTORS {
            stream_targets.push(StreamTarget::Local(
                site * NUM_VECTORS + INVERSE_DIRECTIONS[dir],
            ));
        }
    }
    DomainLayout {
        site_count,
        inner_counts: [1, 1, 1, 1, 1, 1],
        inter_counts: [0; 6],
        stream_targets,
        boundary_ids: vec![0; site_count],
        shared_count: 0,
    }
}

fn test_boundary() -> BoundaryValues {
    let inlet = BoundaryRegion {
        mean_density: 1.04,
        density_amplitude: 0.02,
        phase_offset: 0.0,
        normal: DVec3::Z,
    };
    let outlet = BoundaryRegion {
        mean_density: 1.0,
        density_amplitude: 0.02,
        phase_offset: 0.0,
        normal: -DVec3::Z,
    };
    BoundaryValues::new(vec![inlet], vec![outlet]).unwrap()
}

fn build_engine(steps_per_cycle: u64) -> LbmEngine {
    LbmEngine::builder()
        .layout(six_kind_layout())
        .boundary(test_boundary())
        .steps_per_cycle(steps_per_cycle)
        .build()
        .unwrap()
}

#[test]
fn partition_offsets_tile_all_sites() {
    let layout = six_kind_layout();

    let mut covered = vec![false; layout.site_count];
    for locality in [Locality::Inner, Locality::Inter] {
        for kind in CollisionKind::ALL {
            for site in layout.partition_range(locality, kind) {
                assert!(!covered[site]);
                covered[site] = true;
            }
        }
    }
    assert!(covered.iter().all(|&c| c));
    assert_eq!(
        layout.inner_site_count() + layout.inter_site_count(),
        layout.site_count
    );
}

#[test]
fn full_cycle_stays_finite() {
    let hub = MessageHub::new();
    let mut transport = MemoryTransport::connect(&hub, 0);
    let mut engine = build_engine(8);

    for _ in 0..8 {
        engine.advance_timestep(&mut transport).unwrap();
        engine.update_inlet_velocities();
    }

    assert_eq!(engine.clock().completed_cycles(), 1);
    for site in 0..6 {
        let (density, momentum) =
            lattice::calculate_density_and_momentum(engine.domain().field().old_site(site));
        assert!(density.is_finite() && density > 0.0, "站点 {site} 密度异常");
        assert!(momentum.is_finite());
    }
}

#[test]
fn boundary_sampling_tracks_applied_density() {
    let hub = MessageHub::new();
    let mut transport = MemoryTransport::connect(&hub, 0);
    let mut engine = build_engine(8);

    for _ in 0..8 {
        engine.advance_timestep(&mut transport).unwrap();
    }

    // 进/出口站点的 "new" 密度即施加密度；8 个等距相位上
    // cos 项相消，采样均值回到周期平均密度
    let inlet_mean = engine
        .boundary()
        .sampling(BoundaryFamily::Inlet)
        .mean(0)
        .unwrap();
    let outlet_mean = engine
        .boundary()
        .sampling(BoundaryFamily::Outlet)
        .mean(0)
        .unwrap();

    // 入口族包含 inlet 与 inlet-wall 两个站点，均施加同一区域密度
    assert_relative_eq!(inlet_mean, 1.04, epsilon = 1e-12);
    assert_relative_eq!(outlet_mean, 1.0, epsilon = 1e-12);
}

struct AlwaysRendering;

impl RenderControl for AlwaysRendering {
    fn is_rendering(&self) -> bool {
        true
    }
}

#[test]
fn rendering_accumulates_during_traversal() {
    let hub = MessageHub::new();
    let mut transport = MemoryTransport::connect(&hub, 0);
    let mut engine = LbmEngineBuilder::new()
        .layout(six_kind_layout())
        .boundary(test_boundary())
        .steps_per_cycle(8)
        .render_control(Box::new(AlwaysRendering))
        .build()
        .unwrap();

    engine.advance_timestep(&mut transport).unwrap();

    // 六个站点各采样一次
    let stats = engine.render_stats();
    assert_eq!(stats.samples, 6);
    assert!(stats.density_min <= stats.density_max);
    assert!(stats.density_min.is_finite());
}

#[test]
fn reset_reinitialises_whole_field() {
    let hub = MessageHub::new();
    let mut transport = MemoryTransport::connect(&hub, 0);
    let mut engine = build_engine(8);

    for _ in 0..5 {
        engine.advance_timestep(&mut transport).unwrap();
    }
    engine.reset();

    assert_eq!(engine.clock().steps_per_cycle(), 16);
    assert_eq!(engine.clock().step(), 0);

    let f_eq = lattice::calculate_feq(engine.boundary().initial_density(), DVec3::ZERO);
    for site in 0..6 {
        for dir in 0..NUM_VECTORS {
            assert_relative_eq!(
                engine.domain().field().old_site(site)[dir],
                f_eq[dir],
                max_relative = 1e-12
            );
        }
    }
}

#[test]
fn engine_from_config_derives_parameters() {
    let json = r#"{
        "fluid": { "viscosity_pa_s": 0.004, "density_kg_m3": 1000.0 },
        "lattice": { "voxel_size_m": 1e-4, "steps_per_cycle": 500 },
        "inlets": [{ "normal": [0, 0, 1], "mean_density": 1.03, "density_amplitude": 0.01 }],
        "outlets": [{ "normal": [0, 0, -1] }]
    }"#;
    let config = SimulationConfig::from_json(json).unwrap();

    let engine = LbmEngineBuilder::from_config(&config)
        .unwrap()
        .layout(six_kind_layout())
        .build()
        .unwrap();

    assert_eq!(engine.clock().steps_per_cycle(), 500);
    assert!(engine.params().tau > 0.5);
    assert_relative_eq!(engine.params().omega, -1.0 / engine.params().tau);
    // 初始密度 = 出口 (mean − amplitude) = 1.0
    assert_relative_eq!(engine.boundary().initial_density(), 1.0, epsilon = 1e-12);
}
