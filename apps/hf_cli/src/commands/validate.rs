// apps/hf_cli/src/commands/validate.rs

//! 验证配置命令
//!
//! 加载配置文件、执行合法性校验，并打印将要使用的派生参数。

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use hf_config::SimulationConfig;
use hf_physics::{LbmParameters, PhysicalProperties};

/// 验证配置参数
#[derive(Args)]
pub struct ValidateArgs {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: PathBuf,
}

/// 执行验证命令
pub fn execute(args: ValidateArgs) -> Result<()> {
    let config = SimulationConfig::from_file(&args.config)
        .with_context(|| format!("配置无效: {}", args.config.display()))?;

    info!("配置有效: {}", args.config.display());

    println!("=== 配置摘要 ===");
    println!("黏度: {} Pa·s", config.fluid.viscosity_pa_s);
    println!("密度: {} kg/m³", config.fluid.density_kg_m3);
    println!("体素边长: {} m", config.lattice.voxel_size_m);
    println!("脉动周期: {} s", config.lattice.pulsatile_period_s);
    println!("每周期步数: {}", config.lattice.steps_per_cycle);
    println!("入口区域: {} 个", config.inlets.len());
    println!("出口区域: {} 个", config.outlets.len());

    let properties = PhysicalProperties::from_config(&config);
    let params = LbmParameters::derive(&properties, config.lattice.steps_per_cycle);

    println!("\n=== 派生松弛参数 ===");
    println!("tau: {:.6}", params.tau);
    println!("omega: {:.6}", params.omega);
    println!("stress_parameter: {:.6}", params.stress_parameter);
    println!("beta: {:.6}", params.beta);

    if params.tau < 0.51 {
        println!("\n警告: tau 过于接近 0.5，模拟可能数值失稳");
    }

    Ok(())
}
