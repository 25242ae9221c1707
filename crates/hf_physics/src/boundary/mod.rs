// crates/hf_physics/src/boundary/mod.rs

//! 边界条件模块
//!
//! - [`regions`]: 边界区域密度序列与逐步刷新
//! - [`comms`]: 边界值的收集/分发通信（collector 扇入/扇出）

pub mod comms;
pub mod regions;

pub use comms::BoundaryComms;
pub use regions::{BoundaryRegion, BoundaryValues, RegionSampling};
