// crates/hf_config/src/simulation.rs

//! SimulationConfig - 模拟配置（全 f64）
//!
//! 定义一次脉动流模拟的全部外部参数：流体物性、格子离散、
//! 进出口边界密度序列和运行控制。使用纯 f64 存储以便 JSON 序列化。
//!
//! 密度相关量使用格子单位（静息密度 ≈ 1.0），物性常数使用 SI 单位。

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// 模拟配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// 流体物性
    #[serde(default)]
    pub fluid: FluidConfig,

    /// 格子离散参数
    #[serde(default)]
    pub lattice: LatticeConfig,

    /// 入口边界区域
    #[serde(default)]
    pub inlets: Vec<IoletConfig>,

    /// 出口边界区域
    #[serde(default)]
    pub outlets: Vec<IoletConfig>,

    /// 运行控制
    #[serde(default)]
    pub run: RunConfig,
}

/// 流体物性配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FluidConfig {
    /// 动力黏度 [Pa·s]
    #[serde(default = "default_viscosity")]
    pub viscosity_pa_s: f64,

    /// 流体密度 [kg/m³]
    #[serde(default = "default_density")]
    pub density_kg_m3: f64,
}

fn default_viscosity() -> f64 {
    0.004
}
fn default_density() -> f64 {
    1000.0
}

impl Default for FluidConfig {
    fn default() -> Self {
        Self {
            viscosity_pa_s: default_viscosity(),
            density_kg_m3: default_density(),
        }
    }
}

/// 格子离散配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatticeConfig {
    /// 体素边长 [m]
    #[serde(default = "default_voxel_size")]
    pub voxel_size_m: f64,

    /// 每个脉动周期的时间步数
    #[serde(default = "default_steps_per_cycle")]
    pub steps_per_cycle: u64,

    /// 脉动周期 [s]（心率 70 bpm 对应 60/70 s）
    #[serde(default = "default_pulsatile_period")]
    pub pulsatile_period_s: f64,
}

fn default_voxel_size() -> f64 {
    1e-4
}
fn default_steps_per_cycle() -> u64 {
    1000
}
fn default_pulsatile_period() -> f64 {
    60.0 / 70.0
}

impl Default for LatticeConfig {
    fn default() -> Self {
        Self {
            voxel_size_m: default_voxel_size(),
            steps_per_cycle: default_steps_per_cycle(),
            pulsatile_period_s: default_pulsatile_period(),
        }
    }
}

/// 单个进/出口边界区域配置
///
/// 边界施加的密度按 `mean + amplitude·cos(2π·t/T + phase)` 随周期变化。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IoletConfig {
    /// 周期平均密度（格子单位）
    #[serde(default = "default_mean_density")]
    pub mean_density: f64,

    /// 密度振幅（格子单位）
    #[serde(default)]
    pub density_amplitude: f64,

    /// 相位 [rad]
    #[serde(default)]
    pub phase_rad: f64,

    /// 边界外法向（无需归一化，加载后归一化）
    pub normal: [f64; 3],
}

fn default_mean_density() -> f64 {
    1.0
}

/// 运行控制配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// 模拟的脉动周期数
    #[serde(default = "default_cycles")]
    pub cycles: u64,

    /// 并行化阈值（站点数低于此值时走串行路径）
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
}

fn default_cycles() -> u64 {
    1
}
fn default_parallel_threshold() -> usize {
    1000
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            cycles: default_cycles(),
            parallel_threshold: default_parallel_threshold(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            fluid: FluidConfig::default(),
            lattice: LatticeConfig::default(),
            inlets: Vec::new(),
            outlets: vec![IoletConfig {
                mean_density: default_mean_density(),
                density_amplitude: 0.0,
                phase_rad: 0.0,
                normal: [0.0, 0.0, 1.0],
            }],
            run: RunConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// 从文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    /// 从 JSON 字符串解析配置
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig =
            serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fluid.viscosity_pa_s <= 0.0 {
            return Err(ConfigError::invalid_value(
                "fluid.viscosity_pa_s",
                self.fluid.viscosity_pa_s,
                "黏度必须为正",
            ));
        }
        if self.fluid.density_kg_m3 <= 0.0 {
            return Err(ConfigError::invalid_value(
                "fluid.density_kg_m3",
                self.fluid.density_kg_m3,
                "密度必须为正",
            ));
        }
        if self.lattice.voxel_size_m <= 0.0 {
            return Err(ConfigError::invalid_value(
                "lattice.voxel_size_m",
                self.lattice.voxel_size_m,
                "体素边长必须为正",
            ));
        }
        if self.lattice.steps_per_cycle == 0 {
            return Err(ConfigError::invalid_value(
                "lattice.steps_per_cycle",
                self.lattice.steps_per_cycle,
                "每周期步数必须大于 0",
            ));
        }
        if self.lattice.pulsatile_period_s <= 0.0 {
            return Err(ConfigError::invalid_value(
                "lattice.pulsatile_period_s",
                self.lattice.pulsatile_period_s,
                "脉动周期必须为正",
            ));
        }

        // 初始条件由出口密度平均值导出，至少需要一个出口
        if self.outlets.is_empty() {
            return Err(ConfigError::missing_section("outlets"));
        }

        for (label, iolets) in [("inlets", &self.inlets), ("outlets", &self.outlets)] {
            for (i, iolet) in iolets.iter().enumerate() {
                iolet.validate(label, i)?;
            }
        }

        Ok(())
    }
}

impl IoletConfig {
    fn validate(&self, family: &str, index: usize) -> Result<(), ConfigError> {
        if self.mean_density <= 0.0 {
            return Err(ConfigError::invalid_value(
                format!("{family}[{index}].mean_density"),
                self.mean_density,
                "平均密度必须为正",
            ));
        }
        // 振幅不得使瞬时密度降到零以下
        if self.density_amplitude < 0.0 || self.density_amplitude >= self.mean_density {
            return Err(ConfigError::invalid_value(
                format!("{family}[{index}].density_amplitude"),
                self.density_amplitude,
                "振幅必须在 [0, mean_density) 内",
            ));
        }
        let n = self.normal;
        let norm_sq = n[0] * n[0] + n[1] * n[1] + n[2] * n[2];
        if norm_sq <= 0.0 || !norm_sq.is_finite() {
            return Err(ConfigError::invalid_value(
                format!("{family}[{index}].normal"),
                format!("{n:?}"),
                "法向量不能为零向量",
            ));
        }
        Ok(())
    }
}

// ============================================================
// 测试
// ============================================================
