// crates/hf_physics/src/boundary/regions.rs

//! 边界区域密度序列
//!
//! 每个进/出口区域持有一对随周期变化的密度统计量（平均值、振幅）
//! 和一个边界法向。施加密度按
//! `mean + amplitude·cos(2π·phase + phase_offset)` 合成，
//! 每个时间步由引擎刷新一次。
//!
//! 初始条件密度取全部出口的 `(mean − amplitude)` 平均值，
//! 即周期最低点的出口密度均值。

use glam::DVec3;
use serde::{Deserialize, Serialize};

use hf_config::{IoletConfig, SimulationConfig};
use hf_foundation::{ensure, HfError, HfResult};

use crate::types::BoundaryFamily;

// ============================================================
// 单个边界区域
// ============================================================

/// 边界区域：密度序列参数与法向
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundaryRegion {
    /// 周期平均密度（格子单位）
    pub mean_density: f64,
    /// 密度振幅（格子单位）
    pub density_amplitude: f64,
    /// 相位偏移 [rad]
    pub phase_offset: f64,
    /// 边界外法向（单位向量）
    pub normal: DVec3,
}

impl BoundaryRegion {
    /// 从配置构建（法向归一化）
    pub fn from_config(config: &IoletConfig) -> Self {
        let normal = DVec3::from_array(config.normal).normalize();
        Self {
            mean_density: config.mean_density,
            density_amplitude: config.density_amplitude,
            phase_offset: config.phase_rad,
            normal,
        }
    }

    /// 给定周期相位（[0, 1)）下的施加密度
    #[inline]
    pub fn applied_density(&self, cycle_phase: f64) -> f64 {
        self.mean_density
            + self.density_amplitude
                * (2.0 * std::f64::consts::PI * cycle_phase + self.phase_offset).cos()
    }
}

// ============================================================
// 区域采样
// ============================================================

/// 逐区域的实测密度累积器（post-step 边界簿记）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegionSampling {
    sums: Vec<f64>,
    counts: Vec<u64>,
}

impl RegionSampling {
    /// 创建 n 个区域的累积器
    pub fn new(regions: usize) -> Self {
        Self {
            sums: vec![0.0; regions],
            counts: vec![0; regions],
        }
    }

    /// 记录一次站点密度采样
    #[inline]
    pub fn record(&mut self, region: usize, density: f64) {
        self.sums[region] += density;
        self.counts[region] += 1;
    }

    /// 区域的平均实测密度（无采样时为 None）
    pub fn mean(&self, region: usize) -> Option<f64> {
        (self.counts[region] > 0).then(|| self.sums[region] / self.counts[region] as f64)
    }

    /// 清空累积
    pub fn reset(&mut self) {
        self.sums.fill(0.0);
        self.counts.fill(0);
    }
}

// ============================================================
// 边界值表
// ============================================================

/// 本进程的边界区域表
///
/// 持有入口/出口区域定义、每步刷新的施加密度缓存，
/// 以及 post-step 更新的实测密度累积。
#[derive(Debug, Clone)]
pub struct BoundaryValues {
    inlets: Vec<BoundaryRegion>,
    outlets: Vec<BoundaryRegion>,
    applied_inlets: Vec<f64>,
    applied_outlets: Vec<f64>,
    inlet_sampling: RegionSampling,
    outlet_sampling: RegionSampling,
}

impl BoundaryValues {
    /// 由区域定义构建；至少需要一个出口
    pub fn new(inlets: Vec<BoundaryRegion>, outlets: Vec<BoundaryRegion>) -> HfResult<Self> {
        ensure!(
            !outlets.is_empty(),
            HfError::invalid_input("至少需要一个出口区域（初始条件由出口密度导出）")
        );

        let applied_inlets = inlets.iter().map(|r| r.applied_density(0.0)).collect();
        let applied_outlets = outlets.iter().map(|r| r.applied_density(0.0)).collect();
        let inlet_sampling = RegionSampling::new(inlets.len());
        let outlet_sampling = RegionSampling::new(outlets.len());

        Ok(Self {
            inlets,
            outlets,
            applied_inlets,
            applied_outlets,
            inlet_sampling,
            outlet_sampling,
        })
    }

    /// 从配置构建
    pub fn from_config(config: &SimulationConfig) -> HfResult<Self> {
        Self::new(
            config.inlets.iter().map(BoundaryRegion::from_config).collect(),
            config.outlets.iter().map(BoundaryRegion::from_config).collect(),
        )
    }

    /// 入口区域数
    #[inline]
    pub fn inlet_count(&self) -> usize {
        self.inlets.len()
    }

    /// 出口区域数
    #[inline]
    pub fn outlet_count(&self) -> usize {
        self.outlets.len()
    }

    /// 某族的区域数
    #[inline]
    pub fn region_count(&self, family: BoundaryFamily) -> usize {
        match family {
            BoundaryFamily::Inlet => self.inlets.len(),
            BoundaryFamily::Outlet => self.outlets.len(),
        }
    }

    /// 入口区域的单位法向
    #[inline]
    pub fn inlet_normal(&self, region: usize) -> DVec3 {
        self.inlets[region].normal
    }

    /// 按当前周期相位刷新全部施加密度
    pub fn refresh(&mut self, cycle_phase: f64) {
        for (applied, region) in self.applied_inlets.iter_mut().zip(&self.inlets) {
            *applied = region.applied_density(cycle_phase);
        }
        for (applied, region) in self.applied_outlets.iter_mut().zip(&self.outlets) {
            *applied = region.applied_density(cycle_phase);
        }
    }

    /// 某族某区域当前的施加密度
    #[inline]
    pub fn applied(&self, family: BoundaryFamily, region: usize) -> f64 {
        match family {
            BoundaryFamily::Inlet => self.applied_inlets[region],
            BoundaryFamily::Outlet => self.applied_outlets[region],
        }
    }

    /// 初始条件密度：全部出口 `(mean − amplitude)` 的平均
    pub fn initial_density(&self) -> f64 {
        let sum: f64 = self
            .outlets
            .iter()
            .map(|r| r.mean_density - r.density_amplitude)
            .sum();
        sum / self.outlets.len() as f64
    }

    // ========== 实测密度簿记 ==========

    /// 记录一次边界站点密度采样
    #[inline]
    pub fn record_sample(&mut self, family: BoundaryFamily, region: usize, density: f64) {
        match family {
            BoundaryFamily::Inlet => self.inlet_sampling.record(region, density),
            BoundaryFamily::Outlet => self.outlet_sampling.record(region, density),
        }
    }

    /// 某族的采样累积
    pub fn sampling(&self, family: BoundaryFamily) -> &RegionSampling {
        match family {
            BoundaryFamily::Inlet => &self.inlet_sampling,
            BoundaryFamily::Outlet => &self.outlet_sampling,
        }
    }

    /// 清空采样累积（Reset 路径）
    pub fn reset_sampling(&mut self) {
        self.inlet_sampling.reset();
        self.outlet_sampling.reset();
    }

    // ========== 统计量打包（collector 分发用） ==========

    /// 打包后的统计量长度：每区域 (mean, amplitude) 一对
    #[inline]
    pub fn statistics_len(&self) -> usize {
        2 * (self.inlets.len() + self.outlets.len())
    }

    /// 将 (mean, amplitude) 对按 [入口..., 出口...] 顺序打包
    pub fn pack_statistics(&self, out: &mut [f64]) {
        debug_assert_eq!(out.len(), self.statistics_len());
        let mut cursor = 0;
        for region in self.inlets.iter().chain(&self.outlets) {
            out[cursor] = region.mean_density;
            out[cursor + 1] = region.density_amplitude;
            cursor += 2;
        }
    }

    /// 用收到的聚合统计量覆盖本地区域值
    pub fn apply_statistics(&mut self, values: &[f64]) -> HfResult<()> {
        HfError::check_size("boundary_statistics", self.statistics_len(), values.len())?;
        let mut cursor = 0;
        for region in self.inlets.iter_mut().chain(self.outlets.iter_mut()) {
            region.mean_density = values[cursor];
            region.density_amplitude = values[cursor + 1];
            cursor += 2;
        }
        Ok(())
    }
}

// ============================================================
// 测试
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn region(mean: f64, amp: f64) -> BoundaryRegion {
        BoundaryRegion {
            mean_density: mean,
            density_amplitude: amp,
            phase_offset: 0.0,
            normal: DVec3::Z,
        }
    }

    #[test]
    fn test_applied_density_over_cycle() {
        let r = region(1.0, 0.1);

        // 相位 0：峰值；1/4 周期：均值；半周期：谷值
        assert_relative_eq!(r.applied_density(0.0), 1.1, max_relative = 1e-12);
        assert_relative_eq!(r.applied_density(0.25), 1.0, epsilon = 1e-12);
        assert_relative_eq!(r.applied_density(0.5), 0.9, max_relative = 1e-12);
    }

    #[test]
    fn test_initial_density_averages_outlets() {
        let values =
            BoundaryValues::new(vec![region(1.2, 0.1)], vec![region(1.0, 0.1), region(1.1, 0.05)])
                .unwrap();

        // (0.9 + 1.05) / 2
        assert_relative_eq!(values.initial_density(), 0.975, max_relative = 1e-12);
    }

    #[test]
    fn test_requires_an_outlet() {
        assert!(BoundaryValues::new(vec![region(1.0, 0.0)], Vec::new()).is_err());
    }

    #[test]
    fn test_refresh_updates_applied() {
        let mut values =
            BoundaryValues::new(vec![region(1.0, 0.2)], vec![region(1.0, 0.0)]).unwrap();

        values.refresh(0.5);
        assert_relative_eq!(
            values.applied(BoundaryFamily::Inlet, 0),
            0.8,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            values.applied(BoundaryFamily::Outlet, 0),
            1.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_statistics_pack_apply_roundtrip() {
        let source =
            BoundaryValues::new(vec![region(1.05, 0.02)], vec![region(0.98, 0.01)]).unwrap();
        let mut sink =
            BoundaryValues::new(vec![region(1.0, 0.0)], vec![region(1.0, 0.0)]).unwrap();

        let mut buffer = vec![0.0; source.statistics_len()];
        source.pack_statistics(&mut buffer);
        sink.apply_statistics(&buffer).unwrap();

        sink.refresh(0.0);
        assert_relative_eq!(
            sink.applied(BoundaryFamily::Inlet, 0),
            1.07,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_apply_statistics_length_checked() {
        let mut values =
            BoundaryValues::new(Vec::new(), vec![region(1.0, 0.0)]).unwrap();
        assert!(values.apply_statistics(&[1.0]).is_err());
    }

    #[test]
    fn test_region_sampling_mean() {
        let mut sampling = RegionSampling::new(2);
        assert!(sampling.mean(0).is_none());

        sampling.record(0, 1.0);
        sampling.record(0, 1.2);
        assert_relative_eq!(sampling.mean(0).unwrap(), 1.1, max_relative = 1e-12);

        sampling.reset();
        assert!(sampling.mean(0).is_none());
    }

    #[test]
    fn test_normal_normalized_from_config() {
        let config = IoletConfig {
            mean_density: 1.0,
            density_amplitude: 0.0,
            phase_rad: 0.0,
            normal: [0.0, 0.0, 2.0],
        };
        let region = BoundaryRegion::from_config(&config);
        assert_relative_eq!(region.normal.length(), 1.0, max_relative = 1e-12);
    }
}
