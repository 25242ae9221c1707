// apps/hf_cli/src/main.rs

//! HemoFlow 命令行界面
//!
//! 提供脉动流格子 Boltzmann 模拟的命令行工具。
//!
//! # 架构层级
//!
//! 本模块属于应用层：加载 `SimulationConfig`，构建演示用管道
//! 格子与进程内传输，驱动引擎按时间步推进。

mod commands;
mod duct;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// HemoFlow 格子 Boltzmann 血流模拟命令行工具
#[derive(Parser)]
#[command(name = "hf_cli")]
#[command(author = "HemoFlow Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "HemoFlow pulsatile lattice-Boltzmann flow solver", long_about = None)]
struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 运行模拟
    Run(commands::run::RunArgs),
    /// 显示信息
    Info(commands::info::InfoArgs),
    /// 验证配置
    Validate(commands::validate::ValidateArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 初始化日志
    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // 执行命令
    match cli.command {
        Commands::Run(args) => commands::run::execute(args),
        Commands::Info(args) => commands::info::execute(args),
        Commands::Validate(args) => commands::validate::execute(args),
    }
}
