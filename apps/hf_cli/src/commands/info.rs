// apps/hf_cli/src/commands/info.rs

//! 信息显示命令
//!
//! 显示版本、格子模型与默认配置信息。

use anyhow::Result;
use clap::Args;

use hf_config::SimulationConfig;
use hf_physics::lattice::{EQUILIBRIUM_WEIGHTS, NUM_VECTORS};
use hf_physics::CS2;

/// 信息显示参数
#[derive(Args)]
pub struct InfoArgs {
    /// 显示默认配置 JSON
    #[arg(long)]
    pub defaults: bool,
}

/// 执行信息命令
pub fn execute(args: InfoArgs) -> Result<()> {
    println!("=== HemoFlow 信息 ===");
    println!("版本: {}", env!("CARGO_PKG_VERSION"));
    println!("目标平台: {}", std::env::consts::ARCH);
    println!("操作系统: {}", std::env::consts::OS);

    println!("\n=== 格子模型 ===");
    println!("离散速度集: D3Q15 ({NUM_VECTORS} 方向)");
    println!("声速平方 Cs²: {CS2}");
    let weight_sum: f64 = EQUILIBRIUM_WEIGHTS.iter().sum();
    println!("平衡权重和: {weight_sum}");

    if args.defaults {
        println!("\n=== 默认配置 ===");
        let config = SimulationConfig::default();
        println!("{}", serde_json::to_string_pretty(&config)?);
    }

    Ok(())
}
