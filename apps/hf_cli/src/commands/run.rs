// apps/hf_cli/src/commands/run.rs

//! 运行模拟命令
//!
//! 在演示用直管格子上驱动脉动流模拟：加载（或合成）配置、
//! 构建引擎与进程内传输，按时间步推进若干个脉动周期，
//! 周期末输出入口速度与边界密度统计。

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use hf_config::{IoletConfig, SimulationConfig};
use hf_physics::{
    BoundaryFamily, LbmEngineBuilder, MemoryTransport, MessageHub,
};

use crate::duct::build_duct_layout;

/// 运行模拟参数
#[derive(Args)]
pub struct RunArgs {
    /// 配置文件路径（缺省时使用内置演示配置）
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 管道横截面宽度（站点数）
    #[arg(long, default_value = "6")]
    pub width: usize,

    /// 管道横截面高度（站点数）
    #[arg(long, default_value = "6")]
    pub height: usize,

    /// 管道流向长度（站点数）
    #[arg(long, default_value = "12")]
    pub length: usize,

    /// 覆盖配置中的模拟周期数
    #[arg(long)]
    pub cycles: Option<u64>,
}

/// 执行运行命令
pub fn execute(args: RunArgs) -> Result<()> {
    info!("=== HemoFlow 模拟启动 ===");

    let config = match &args.config {
        Some(path) => SimulationConfig::from_file(path)
            .with_context(|| format!("加载配置失败: {}", path.display()))?,
        None => demo_config(),
    };

    let cycles = args.cycles.unwrap_or(config.run.cycles);
    let steps_per_cycle = config.lattice.steps_per_cycle;

    info!(
        "管道 {}×{}×{}, 每周期 {} 步, 共 {} 个周期",
        args.width, args.height, args.length, steps_per_cycle, cycles
    );

    let layout = build_duct_layout(args.width, args.height, args.length);
    info!(
        "站点 {} 个 (体相 {}, 壁面 {}, 入口族 {}, 出口族 {})",
        layout.site_count,
        layout.inner_counts[0],
        layout.inner_counts[1],
        layout.inner_counts[2] + layout.inner_counts[4],
        layout.inner_counts[3] + layout.inner_counts[5],
    );

    let mut engine = LbmEngineBuilder::from_config(&config)
        .context("读取边界区域失败")?
        .layout(layout)
        .build()
        .context("构建引擎失败")?;

    info!(
        "松弛参数: tau={:.6}, omega={:.6}, stress={:.6}",
        engine.params().tau,
        engine.params().omega,
        engine.params().stress_parameter
    );

    // 单进程运行：无邻居，仍走完整的通信编排
    let hub = MessageHub::new();
    let mut transport = MemoryTransport::connect(&hub, 0);

    let start = Instant::now();
    for cycle in 0..cycles {
        for _ in 0..steps_per_cycle {
            engine
                .advance_timestep(&mut transport)
                .context("时间步推进失败（通信异常，中止运行）")?;
            engine.update_inlet_velocities();
        }

        let inlet_mean = engine.inlet_stats().mean(0).unwrap_or(0.0);
        let inlet_peak = engine.inlet_stats().peak(0);
        let outlet_density = engine
            .boundary()
            .sampling(BoundaryFamily::Outlet)
            .mean(0)
            .unwrap_or(0.0);

        info!(
            "周期 {}/{}: 入口速度 均值={:.6} 峰值={:.6}, 出口实测密度={:.6}",
            cycle + 1,
            cycles,
            inlet_mean,
            inlet_peak,
            outlet_density
        );
        engine.reset_inlet_statistics();
    }

    let elapsed = start.elapsed();
    info!("=== 模拟完成 ===");
    info!("总步数: {}", engine.clock().step());
    info!("计算时间: {:.2} s", elapsed.as_secs_f64());

    Ok(())
}

/// 内置演示配置：一对 ±z 法向的进/出口，轻微脉动
fn demo_config() -> SimulationConfig {
    let mut config = SimulationConfig::default();
    config.lattice.steps_per_cycle = 200;
    config.inlets = vec![IoletConfig {
        mean_density: 1.01,
        density_amplitude: 0.005,
        phase_rad: 0.0,
        normal: [0.0, 0.0, 1.0],
    }];
    config.outlets = vec![IoletConfig {
        mean_density: 1.0,
        density_amplitude: 0.0,
        phase_rad: 0.0,
        normal: [0.0, 0.0, -1.0],
    }];
    config
}
