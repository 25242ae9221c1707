// crates/hf_physics/src/vis.rs

//! 可视化控制接口
//!
//! 渲染子系统是外部协作者，本模块只定义引擎消费的窄接口：
//! 一个布尔的"当前是否在渲染"查询。遍历层据此决定是否在同一次
//! 扫描中顺带累积渲染相关统计量（密度极值、速度/应力峰值）。

/// 可视化控制查询
pub trait RenderControl {
    /// 当前时间步是否在渲染
    fn is_rendering(&self) -> bool;
}

/// 永不渲染的空实现
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderControl;

impl RenderControl for NullRenderControl {
    fn is_rendering(&self) -> bool {
        false
    }
}

/// 渲染统计累积器
///
/// 渲染开启时由流动-碰撞遍历就地更新，避免第二次全场扫描。
#[derive(Debug, Clone, Copy)]
pub struct RenderStats {
    /// 密度下界
    pub density_min: f64,
    /// 密度上界
    pub density_max: f64,
    /// 速度模峰值
    pub velocity_max: f64,
    /// von Mises 应力峰值
    pub stress_max: f64,
    /// 采样站点数
    pub samples: usize,
}

impl Default for RenderStats {
    fn default() -> Self {
        Self {
            density_min: f64::INFINITY,
            density_max: f64::NEG_INFINITY,
            velocity_max: 0.0,
            stress_max: 0.0,
            samples: 0,
        }
    }
}

impl RenderStats {
    /// 记录一个站点的采样
    #[inline]
    pub fn record(&mut self, density: f64, velocity: f64, stress: f64) {
        self.density_min = self.density_min.min(density);
        self.density_max = self.density_max.max(density);
        self.velocity_max = self.velocity_max.max(velocity);
        self.stress_max = self.stress_max.max(stress);
        self.samples += 1;
    }

    /// 清空统计
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// ============================================================
// 测试
// ============================================================
