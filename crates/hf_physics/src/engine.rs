// crates/hf_physics/src/engine.rs

//! 模拟引擎
//!
//! 每个时间步的状态机：
//!
//! ```text
//! request_comms → pre_send → (传输在途) → pre_receive
//!               → post_receive → end_iteration
//! ```
//!
//! - `request_comms`: 刷新边界施加密度，为每个邻居投递一次
//!   非阻塞接收（落入 "old" 共享区）
//! - `pre_send`: 对六类 inter 分区做流动-碰撞；出站 halo 数据
//!   就绪后为每个邻居投递一次非阻塞发送（"new" 共享区）
//! - `pre_receive`: 对六类 inner 分区做流动-碰撞，与在途传输重叠
//! - `post_receive`: 等待传输完成，经共享面翻译表把接收值拷入
//!   "new"，再按先 inner 后 inter 的顺序做 post-step 收尾
//! - `end_iteration`: 交换 old/new 并推进时钟；只能在
//!   `post_receive` 之后调用
//!
//! 唯一可恢复的异常是数值失稳（由外部监测），经显式 [`LbmEngine::reset`]
//! 处理：周期步数加倍、参数整体重算、全场回到平衡初值。

use glam::DVec3;
use rayon::prelude::*;

use hf_config::SimulationConfig;
use hf_foundation::{ensure, HfError, HfResult};

use crate::boundary::{BoundaryComms, BoundaryValues};
use crate::domain::{DomainLayout, FlowDomain, Locality, SharedFaceMap};
use crate::lattice;
use crate::state::SimulationClock;
use crate::sweep::{self, SweepContext};
use crate::topology::TopologyContext;
use crate::transport::{Transport, TransportResult};
use crate::types::{CollisionKind, LbmParameters, PhysicalProperties};
use crate::vis::{NullRenderControl, RenderControl, RenderStats};

// ============================================================
// 入口速度统计
// ============================================================

/// 逐入口区域的法向速度统计（峰值与均值，供外部监测）
#[derive(Debug, Clone, Default)]
pub struct InletVelocityStats {
    peaks: Vec<f64>,
    sums: Vec<f64>,
    counts: Vec<u64>,
}

impl InletVelocityStats {
    /// 创建 n 个入口区域的统计器
    pub fn new(regions: usize) -> Self {
        Self {
            peaks: vec![0.0; regions],
            sums: vec![0.0; regions],
            counts: vec![0; regions],
        }
    }

    /// 记录一次带符号法向速度
    #[inline]
    pub fn record(&mut self, region: usize, velocity: f64) {
        self.peaks[region] = self.peaks[region].max(velocity.abs());
        self.sums[region] += velocity;
        self.counts[region] += 1;
    }

    /// 区域速度模峰值
    pub fn peak(&self, region: usize) -> f64 {
        self.peaks[region]
    }

    /// 区域带符号速度均值（无采样时为 None）
    pub fn mean(&self, region: usize) -> Option<f64> {
        (self.counts[region] > 0).then(|| self.sums[region] / self.counts[region] as f64)
    }

    /// 清空统计
    pub fn reset(&mut self) {
        self.peaks.fill(0.0);
        self.sums.fill(0.0);
        self.counts.fill(0);
    }
}

// ============================================================
// 引擎
// ============================================================

/// 格子 Boltzmann 模拟引擎
///
/// 每次运行构造一次：拥有双缓冲布居数组、共享面翻译表、
/// 边界区域表与各统计累积器；外部协作者（传输、拓扑、渲染查询）
/// 经窄接口接入。
pub struct LbmEngine {
    properties: PhysicalProperties,
    params: LbmParameters,
    clock: SimulationClock,
    domain: FlowDomain,
    shared_map: SharedFaceMap,
    topology: TopologyContext,
    boundary: BoundaryValues,
    render_control: Box<dyn RenderControl>,
    render_stats: RenderStats,
    inlet_stats: InletVelocityStats,
    parallel_threshold: usize,
}

impl LbmEngine {
    /// 创建构建器
    pub fn builder() -> LbmEngineBuilder {
        LbmEngineBuilder::new()
    }

    // ========== 时间步状态机 ==========

    /// 阶段 1：刷新边界值并投递 halo 接收
    pub fn request_comms<T: Transport>(&mut self, transport: &mut T) -> TransportResult<()> {
        self.boundary.refresh(self.clock.cycle_phase());

        for neighbour in &self.topology.neighbours {
            transport.post_receive(neighbour.rank, neighbour.shared_count)?;
        }
        Ok(())
    }

    /// 阶段 2：inter 分区流动-碰撞，随后投递 halo 发送
    ///
    /// 发送在出站数据写入 "new" 共享区之后投递，仍是非阻塞的，
    /// 且先于 `pre_receive`，本地计算与传输照常重叠。
    pub fn pre_send<T: Transport>(&mut self, transport: &mut T) -> TransportResult<()> {
        let rendering = self.render_control.is_rendering();
        self.sweep_locality(Locality::Inter, rendering);

        let shared = self.domain.field().new_shared();
        for neighbour in &self.topology.neighbours {
            let start = neighbour.first_shared_offset;
            transport.post_send(neighbour.rank, &shared[start..start + neighbour.shared_count])?;
        }
        Ok(())
    }

    /// 阶段 3：inner 分区流动-碰撞（与在途传输重叠）
    pub fn pre_receive(&mut self) {
        let rendering = self.render_control.is_rendering();
        self.sweep_locality(Locality::Inner, rendering);
    }

    /// 阶段 4：等待传输，拷入接收布居，post-step 收尾
    pub fn post_receive<T: Transport>(&mut self, transport: &mut T) -> TransportResult<()> {
        transport.wait_all()?;

        // 接收数据按邻居偏移落入 "old" 共享区
        {
            let shared = self.domain.field_mut().old_shared_mut();
            for neighbour in &self.topology.neighbours {
                let start = neighbour.first_shared_offset;
                transport
                    .drain_received(neighbour.rank, &mut shared[start..start + neighbour.shared_count])?;
            }
        }

        // 翻译拷贝：old 共享区 → new 目的槽位（单进程时为空操作）
        {
            let field = self.domain.field_mut();
            let shared_base = field.shared_base();
            let (old, new) = field.buffers_mut();
            for slot in 0..self.shared_map.len() {
                new[self.shared_map.destination(slot)] = old[shared_base + slot];
            }
        }

        // 边界收尾：先 inner 后 inter
        self.post_step_locality(Locality::Inner);
        self.post_step_locality(Locality::Inter);
        Ok(())
    }

    /// 阶段 5：交换缓冲并推进时钟
    ///
    /// 必须在 `post_receive` 完成后调用，否则下一步会消费未交换的
    /// 过期数据。
    pub fn end_iteration(&mut self) {
        self.domain.field_mut().swap();
        self.clock.advance();
    }

    /// 驱动一个完整时间步
    pub fn advance_timestep<T: Transport>(&mut self, transport: &mut T) -> TransportResult<()> {
        self.request_comms(transport)?;
        self.pre_send(transport)?;
        self.pre_receive();
        self.post_receive(transport)?;
        self.end_iteration();
        Ok(())
    }

    // ========== 参数与失稳恢复 ==========

    /// 由物理常数与当前周期步数重算松弛参数块
    pub fn recalculate_tau_viscosity_omega(&mut self) {
        self.params = LbmParameters::derive(&self.properties, self.clock.steps_per_cycle());
    }

    /// 失稳恢复：周期步数加倍、参数重算、全场回到平衡初值
    ///
    /// 由外部失稳监测触发；普通时间步不会走到这里。
    pub fn reset(&mut self) {
        self.clock.double_resolution();
        self.recalculate_tau_viscosity_omega();
        self.set_initial_conditions();

        self.boundary.reset_sampling();
        self.render_stats.reset();
        self.inlet_stats.reset();

        tracing::warn!(
            steps_per_cycle = self.clock.steps_per_cycle(),
            tau = self.params.tau,
            "数值失稳恢复: 周期步数加倍并重置为平衡初值"
        );
    }

    /// 全场置为出口平均密度、零速度的平衡分布
    fn set_initial_conditions(&mut self) {
        let density = self.boundary.initial_density();
        let f_eq = lattice::calculate_feq(density, DVec3::ZERO);
        self.domain
            .field_mut()
            .fill_equilibrium(&f_eq, self.parallel_threshold);
    }

    // ========== 入口速度统计 ==========

    /// 更新入口法向速度统计
    ///
    /// 遍历 inner 与 inter 入口分区，由 "old" 布居计算密度与动量，
    /// 记录投影到入口法向的带符号速度；零动量站点单列为 0。
    pub fn update_inlet_velocities(&mut self) {
        let layout = self.domain.layout();
        let field = self.domain.field();
        let boundary = &self.boundary;
        let stats = &mut self.inlet_stats;

        for locality in [Locality::Inner, Locality::Inter] {
            let range = layout.partition_range(locality, CollisionKind::Inlet);
            if range.is_empty() {
                continue;
            }

            if range.len() >= self.parallel_threshold {
                // 收集后累加：采样并行，记录串行
                let samples: Vec<(usize, f64)> = range
                    .into_par_iter()
                    .map(|site| {
                        let region = layout.boundary_ids[site] as usize;
                        let velocity =
                            signed_normal_velocity(boundary, field.old_site(site), region);
                        (region, velocity)
                    })
                    .collect();
                for (region, velocity) in samples {
                    stats.record(region, velocity);
                }
            } else {
                for site in range {
                    let region = layout.boundary_ids[site] as usize;
                    let velocity = signed_normal_velocity(boundary, field.old_site(site), region);
                    stats.record(region, velocity);
                }
            }
        }
    }

    /// 清空入口速度统计（外部监测按周期取数后调用）
    pub fn reset_inlet_statistics(&mut self) {
        self.inlet_stats.reset();
    }

    // ========== 边界值分发 ==========

    /// 与 collector 同步边界密度统计量
    ///
    /// collector 打包本地区域的 (mean, amplitude) 聚合并扇出；
    /// 其余进程接收后覆盖本地区域值。
    pub fn synchronise_boundary_densities<T: Transport>(
        &mut self,
        transport: &mut T,
        comms: &mut BoundaryComms,
    ) -> TransportResult<()> {
        let mut buffer = vec![0.0; self.boundary.statistics_len()];

        if comms.is_collector() {
            self.boundary.pack_statistics(&mut buffer);
        }
        comms.send_and_receive(transport, &mut buffer)?;
        comms.wait_all_comms(transport, &mut buffer)?;

        if !comms.is_collector() {
            // 长度在构造时已对齐，此处只可能因区域表不一致失败
            debug_assert_eq!(buffer.len(), self.boundary.statistics_len());
            let _ = self.boundary.apply_statistics(&buffer);
        }
        Ok(())
    }

    // ========== 内部遍历 ==========

    /// 对某一本地性的六类分区按固定顺序做流动-碰撞
    fn sweep_locality(&mut self, locality: Locality, rendering: bool) {
        let (layout, field) = self.domain.parts_mut();
        let mut ctx = SweepContext {
            params: &self.params,
            boundary: &self.boundary,
            rendering,
            render: &mut self.render_stats,
        };

        let mut offset = match locality {
            Locality::Inner => 0,
            Locality::Inter => layout.inner_site_count(),
        };
        for kind in CollisionKind::ALL {
            let count = layout.partition_count(locality, kind);
            sweep::stream_and_collide(kind, offset..offset + count, layout, field, &mut ctx);
            offset += count;
        }
    }

    /// 对某一本地性的六类分区按固定顺序做 post-step
    fn post_step_locality(&mut self, locality: Locality) {
        let layout = self.domain.layout();
        let field = self.domain.field();

        let mut offset = match locality {
            Locality::Inner => 0,
            Locality::Inter => layout.inner_site_count(),
        };
        for kind in CollisionKind::ALL {
            let count = layout.partition_count(locality, kind);
            sweep::post_step(kind, offset..offset + count, layout, field, &mut self.boundary);
            offset += count;
        }
    }

    // ========== 访问器 ==========

    /// 松弛参数
    pub fn params(&self) -> &LbmParameters {
        &self.params
    }

    /// 周期时钟
    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    /// 流动域
    pub fn domain(&self) -> &FlowDomain {
        &self.domain
    }

    /// 边界区域表
    pub fn boundary(&self) -> &BoundaryValues {
        &self.boundary
    }

    /// 渲染统计
    pub fn render_stats(&self) -> &RenderStats {
        &self.render_stats
    }

    /// 入口速度统计
    pub fn inlet_stats(&self) -> &InletVelocityStats {
        &self.inlet_stats
    }
}

/// 入口站点的带符号法向速度；零动量单列为 0
#[inline]
fn signed_normal_velocity(boundary: &BoundaryValues, f: &[f64], region: usize) -> f64 {
    let (density, momentum) = lattice::calculate_density_and_momentum(f);
    if momentum == DVec3::ZERO {
        // 零流量是独立情形，不携带符号信息
        return 0.0;
    }
    momentum.dot(boundary.inlet_normal(region)) / density
}

// ============================================================
// 构建器
// ============================================================

/// 引擎构建器
///
/// 跨组件不变量（布局自洽、翻译表/拓扑与共享区对齐、边界区域 id
/// 在族内有效）在 `build` 时一次性校验。
pub struct LbmEngineBuilder {
    properties: PhysicalProperties,
    steps_per_cycle: u64,
    parallel_threshold: usize,
    layout: Option<DomainLayout>,
    shared_map: SharedFaceMap,
    topology: TopologyContext,
    boundary: Option<BoundaryValues>,
    render_control: Box<dyn RenderControl>,
}

impl LbmEngineBuilder {
    /// 创建构建器（单进程、无渲染的默认外设）
    pub fn new() -> Self {
        Self {
            properties: PhysicalProperties::default(),
            steps_per_cycle: 1000,
            parallel_threshold: 1000,
            layout: None,
            shared_map: SharedFaceMap::empty(),
            topology: TopologyContext::single_process(),
            boundary: None,
            render_control: Box::new(NullRenderControl),
        }
    }

    /// 从配置初始化物性、周期步数与边界区域
    pub fn from_config(config: &SimulationConfig) -> HfResult<Self> {
        let mut builder = Self::new();
        builder.properties = PhysicalProperties::from_config(config);
        builder.steps_per_cycle = config.lattice.steps_per_cycle;
        builder.parallel_threshold = config.run.parallel_threshold;
        builder.boundary = Some(BoundaryValues::from_config(config)?);
        Ok(builder)
    }

    /// 设置物理常数
    pub fn properties(mut self, properties: PhysicalProperties) -> Self {
        self.properties = properties;
        self
    }

    /// 设置每周期步数
    pub fn steps_per_cycle(mut self, steps: u64) -> Self {
        self.steps_per_cycle = steps;
        self
    }

    /// 设置并行化阈值
    pub fn parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// 设置域布局（必需）
    pub fn layout(mut self, layout: DomainLayout) -> Self {
        self.layout = Some(layout);
        self
    }

    /// 设置共享面翻译表
    pub fn shared_map(mut self, map: SharedFaceMap) -> Self {
        self.shared_map = map;
        self
    }

    /// 设置进程拓扑上下文
    pub fn topology(mut self, topology: TopologyContext) -> Self {
        self.topology = topology;
        self
    }

    /// 设置边界区域表（必需，除非经 `from_config`）
    pub fn boundary(mut self, boundary: BoundaryValues) -> Self {
        self.boundary = Some(boundary);
        self
    }

    /// 设置可视化控制查询
    pub fn render_control(mut self, control: Box<dyn RenderControl>) -> Self {
        self.render_control = control;
        self
    }

    /// 构建引擎并置初始条件
    pub fn build(self) -> HfResult<LbmEngine> {
        ensure!(
            self.steps_per_cycle > 0,
            HfError::invalid_input("每周期步数必须大于 0")
        );

        let layout = self
            .layout
            .ok_or_else(|| HfError::invalid_input("缺少域布局"))?;
        let boundary = self
            .boundary
            .ok_or_else(|| HfError::invalid_input("缺少边界区域表"))?;

        let domain = FlowDomain::new(layout)?;
        self.shared_map.validate(domain.layout())?;
        self.topology.validate(domain.layout())?;
        check_boundary_ids(domain.layout(), &boundary)?;

        let clock = SimulationClock::new(self.steps_per_cycle);
        let params = LbmParameters::derive(&self.properties, self.steps_per_cycle);
        // 合法物性下 τ 严格大于 0.5；越界说明物性参数本身有问题
        ensure!(
            params.tau > 0.5 && params.tau.is_finite(),
            HfError::out_of_range("tau", params.tau, 0.5, f64::MAX)
        );
        let inlet_stats = InletVelocityStats::new(boundary.inlet_count());

        let mut engine = LbmEngine {
            properties: self.properties,
            params,
            clock,
            domain,
            shared_map: self.shared_map,
            topology: self.topology,
            boundary,
            render_control: self.render_control,
            render_stats: RenderStats::default(),
            inlet_stats,
            parallel_threshold: self.parallel_threshold,
        };
        engine.set_initial_conditions();

        tracing::debug!(
            sites = engine.domain.layout().site_count,
            shared = engine.domain.layout().shared_count,
            tau = engine.params.tau,
            "引擎构建完成"
        );
        Ok(engine)
    }
}

impl Default for LbmEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// 校验进/出口分区的边界区域 id 均落在对应族的区域表内
fn check_boundary_ids(layout: &DomainLayout, boundary: &BoundaryValues) -> HfResult<()> {
    for kind in CollisionKind::ALL {
        let family = match kind.boundary_family() {
            Some(family) => family,
            None => continue,
        };
        let regions = boundary.region_count(family);
        for locality in [Locality::Inner, Locality::Inter] {
            for site in layout.partition_range(locality, kind) {
                HfError::check_index("boundary_id", layout.boundary_ids[site] as usize, regions)?;
            }
        }
    }
    Ok(())
}

// ============================================================
// 测试
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::BoundaryRegion;
    use crate::domain::StreamTarget;
    use crate::lattice::{INVERSE_DIRECTIONS, NUM_VECTORS};
    use crate::transport::{MemoryTransport, MessageHub};
    use approx::assert_relative_eq;

    fn test_boundary() -> BoundaryValues {
        let inlet = BoundaryRegion {
            mean_density: 1.02,
            density_amplitude: 0.01,
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

    /// 封闭四站点布局：mid-fluid、wall、inlet、outlet 各一个，
    /// 全部 inner，每方向反弹回本站点
    fn four_site_layout() -> DomainLayout {
        let mut stream_targets = Vec::new();
        for site in 0..4 {
            for dir in 0..NUM_VECTORS {
                stream_targets.push(StreamTarget::Local(
                    site * NUM_VECTORS + INVERSE_DIRECTIONS[dir],
                ));
            }
        }
        DomainLayout {
            site_count: 4,
            inner_counts: [1, 1, 1, 1, 0, 0],
            inter_counts: [0; 6],
            stream_targets,
            boundary_ids: vec![0; 4],
            shared_count: 0,
        }
    }

    fn single_process_engine() -> LbmEngine {
        LbmEngine::builder()
            .layout(four_site_layout())
            .boundary(test_boundary())
            .steps_per_cycle(8)
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_requires_layout_and_boundary() {
        assert!(LbmEngine::builder().build().is_err());
        assert!(LbmEngine::builder()
            .layout(four_site_layout())
            .build()
            .is_err());
    }

    #[test]
    fn test_initial_conditions_from_outlet_density() {
        let engine = single_process_engine();

        // 初始密度 = 出口 (mean − amplitude) 均值 = 0.98
        let expected = 0.98;
        for site in 0..4 {
            let (density, momentum) =
                lattice::calculate_density_and_momentum(engine.domain().field().old_site(site));
            assert_relative_eq!(density, expected, max_relative = 1e-12);
            assert!(momentum.length() < 1e-14);
        }
    }

    #[test]
    fn test_single_process_timestep_completes() {
        let hub = MessageHub::new();
        let mut transport = MemoryTransport::connect(&hub, 0);
        let mut engine = single_process_engine();

        // 无邻居：request_comms 不投递任何请求，halo 拷贝为空操作
        engine.advance_timestep(&mut transport).unwrap();
        assert_eq!(engine.clock().step(), 1);

        // 全场仍为有限值
        for site in 0..4 {
            for &value in engine.domain().field().old_site(site) {
                assert!(value.is_finite());
            }
        }
    }

    #[test]
    fn test_end_iteration_swaps_buffers() {
        let hub = MessageHub::new();
        let mut transport = MemoryTransport::connect(&hub, 0);
        let mut engine = single_process_engine();

        engine.request_comms(&mut transport).unwrap();
        engine.pre_send(&mut transport).unwrap();
        engine.pre_receive();
        engine.post_receive(&mut transport).unwrap();

        let new_before: Vec<f64> = engine.domain().field().new_site(2).to_vec();
        engine.end_iteration();

        // 本步写成 "new" 的数据成为下一步的 "old" 输入
        let old_after = engine.domain().field().old_site(2);
        for dir in 0..NUM_VECTORS {
            assert_relative_eq!(old_after[dir], new_before[dir], max_relative = 1e-14);
        }
    }

    #[test]
    fn test_recalculate_is_deterministic() {
        let mut engine = single_process_engine();
        let before = *engine.params();

        engine.recalculate_tau_viscosity_omega();
        assert_eq!(*engine.params(), before);
    }

    #[test]
    fn test_reset_restores_equilibrium() {
        let hub = MessageHub::new();
        let mut transport = MemoryTransport::connect(&hub, 0);
        let mut engine = single_process_engine();

        for _ in 0..3 {
            engine.advance_timestep(&mut transport).unwrap();
        }

        let steps_before = engine.clock().steps_per_cycle();
        let tau_before = engine.params().tau;
        engine.reset();

        // 周期步数加倍，τ 向 0.5 收拢
        assert_eq!(engine.clock().steps_per_cycle(), 2 * steps_before);
        assert!(engine.params().tau < tau_before);

        // 全场 old/new 均回到出口平均密度的零速度平衡
        let f_eq = lattice::calculate_feq(engine.boundary().initial_density(), DVec3::ZERO);
        for site in 0..4 {
            for dir in 0..NUM_VECTORS {
                assert_relative_eq!(
                    engine.domain().field().old_site(site)[dir],
                    f_eq[dir],
                    max_relative = 1e-12
                );
                assert_relative_eq!(
                    engine.domain().field().new_site(site)[dir],
                    f_eq[dir],
                    max_relative = 1e-12
                );
            }
        }
    }

    #[test]
    fn test_inlet_velocity_zero_flow_is_zero() {
        let mut engine = single_process_engine();

        // 初始条件零动量 → 零流量单列，记录为 0
        engine.update_inlet_velocities();
        assert_relative_eq!(engine.inlet_stats().mean(0).unwrap(), 0.0);
        assert_relative_eq!(engine.inlet_stats().peak(0), 0.0);
    }

    #[test]
    fn test_inlet_velocity_signed_projection() {
        let mut engine = single_process_engine();

        // 往入口站点（站点 2）注入沿 +z 的动量
        let f = lattice::calculate_feq(1.0, DVec3::new(0.0, 0.0, 0.03));
        let base = 2 * NUM_VECTORS;
        {
            let field = engine.domain.field_mut();
            let (_, new) = field.buffers_mut();
            new[base..base + NUM_VECTORS].copy_from_slice(&f);
        }
        engine.domain.field_mut().swap();

        engine.update_inlet_velocities();

        // 入口法向 +z → 投影为正
        let mean = engine.inlet_stats().mean(0).unwrap();
        assert!(mean > 0.0);
        assert_relative_eq!(mean, 0.03, max_relative = 1e-10);

        // 反向流动给出负投影
        engine.inlet_stats.reset();
        let f_rev = lattice::calculate_feq(1.0, DVec3::new(0.0, 0.0, -0.03));
        {
            let field = engine.domain.field_mut();
            let (_, new) = field.buffers_mut();
            new[base..base + NUM_VECTORS].copy_from_slice(&f_rev);
        }
        engine.domain.field_mut().swap();
        engine.update_inlet_velocities();
        assert!(engine.inlet_stats().mean(0).unwrap() < 0.0);
    }

    #[test]
    fn test_reject_invalid_boundary_id() {
        let mut layout = four_site_layout();
        layout.boundary_ids[2] = 5; // 只有 1 个入口区域

        let result = LbmEngine::builder()
            .layout(layout)
            .boundary(test_boundary())
            .build();
        assert!(result.is_err());
    }
}
