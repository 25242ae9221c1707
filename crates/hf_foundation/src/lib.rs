// crates/hf_foundation/src/lib.rs

//! HemoFlow Foundation Layer
//!
//! 基础层，提供整个项目共享的错误类型和运行时校验工具。
//!
//! # 模块概览
//!
//! - [`error`]: 统一错误类型 `HfError` / `HfResult`
//!
//! # 设计原则
//!
//! 1. **最小依赖**: 仅依赖 thiserror
//! 2. **构造时校验**: 尺寸/索引不变量在对象构造时检查一次，
//!    热循环内不再出现 `Result`
//! 3. **失败即终止**: 上层遵循 fail-fast 模型，本层只负责描述错误

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;

pub use error::{HfError, HfResult};

/// Prelude 模块，包含常用类型
pub mod prelude {
    pub use crate::ensure;
    pub use crate::error::{HfError, HfResult};
}
