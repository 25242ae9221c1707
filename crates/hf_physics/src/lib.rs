// crates/hf_physics/src/lib.rs

//! HemoFlow 物理求解器模块
//!
//! 并行格子 Boltzmann 碰撞/流动引擎（D3Q15），提供：
//! - 格子模型纯函数库 (lattice)
//! - 核心类型：碰撞分类、松弛参数 (types)
//! - 双缓冲布居数组与周期时钟 (state)
//! - 域布局、流动映射与共享面翻译表 (domain)
//! - 碰撞规则与流动/访问者分发 (collision, sweep)
//! - 边界区域密度序列与 collector 通信 (boundary)
//! - 进程拓扑上下文与传输接口 (topology, transport)
//! - 可视化控制窄接口 (vis)
//! - 时间步编排引擎 (engine)
//!
//! # 并发模型
//!
//! 每进程单逻辑线程，进程间靠消息传递并行；全部跨进程通信均为
//! 非阻塞（先投递后等待），本地计算与在途传输重叠。布居缓冲由
//! 本进程独占，halo 区按收发两侧严格划分所有权，无锁。
//! rayon 只用于各写各站点槽位的纯局部扫描（平衡初始化、
//! 入口速度统计）。

pub mod boundary;
pub mod collision;
pub mod domain;
pub mod engine;
pub mod lattice;
pub mod state;
pub mod sweep;
pub mod topology;
pub mod transport;
pub mod types;
pub mod vis;

// 重导出常用类型
pub use boundary::{BoundaryComms, BoundaryRegion, BoundaryValues, RegionSampling};
pub use domain::{DomainLayout, FlowDomain, Locality, SharedFaceMap, StreamTarget};
pub use engine::{InletVelocityStats, LbmEngine, LbmEngineBuilder};
pub use state::{PopulationField, SimulationClock};
pub use topology::{Neighbour, Rank, TopologyContext};
pub use transport::{MemoryTransport, MessageHub, Transport, TransportError, TransportResult};
pub use types::{BoundaryFamily, CollisionKind, LbmParameters, PhysicalProperties, CS2};
pub use vis::{NullRenderControl, RenderControl, RenderStats};
