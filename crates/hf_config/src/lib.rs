// crates/hf_config/src/lib.rs

//! HemoFlow Config Layer
//!
//! 配置层，提供模拟参数的加载、默认值填充与合法性校验。
//! 本层只含纯数据类型（全 f64），不依赖物理层；
//! 物理层在构造引擎时从 [`SimulationConfig`] 派生自己的参数块。
//!
//! # 模块概览
//!
//! - [`simulation`]: `SimulationConfig` 及其子配置
//! - [`error`]: 配置错误类型
//!
//! # 层级架构
//!
//! ```text
//! Layer 4: hf_cli        ─> 加载 SimulationConfig，驱动引擎
//! Layer 3: hf_physics    ─> 从 SimulationConfig 派生 LbmParameters 等
//! Layer 2: hf_config     ─> SimulationConfig（本层）
//! Layer 1: hf_foundation
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod simulation;

pub use error::ConfigError;
pub use simulation::{
    FluidConfig, IoletConfig, LatticeConfig, RunConfig, SimulationConfig,
};
