// crates/hf_physics/src/lattice.rs

//! D3Q15 格子模型
//!
//! 纯函数库：平衡分布、宏观量（密度/动量）以及 von Mises 有效应力。
//! 初始化与碰撞物理共用同一套函数，数值语义必须在所有调用方之间
//! 严格一致。
//!
//! # 公式约定
//!
//! 采用动量形式的二阶平衡展开：`calculate_feq` 的速度参数是动量
//! `p = ρu` 而非速度本身，`calculate_density_and_momentum` 返回的
//! 也是动量。往返律：`feq(ρ, p)` 的零阶/一阶矩精确恢复 `(ρ, p)`。

use glam::DVec3;

/// 离散速度方向数
pub const NUM_VECTORS: usize = 15;

/// 各方向 x 分量
pub const CX: [i32; NUM_VECTORS] = [0, 1, -1, 0, 0, 0, 0, 1, -1, 1, -1, 1, -1, 1, -1];
/// 各方向 y 分量
pub const CY: [i32; NUM_VECTORS] = [0, 0, 0, 1, -1, 0, 0, 1, -1, 1, -1, -1, 1, -1, 1];
/// 各方向 z 分量
pub const CZ: [i32; NUM_VECTORS] = [0, 0, 0, 0, 0, 1, -1, 1, -1, -1, 1, 1, -1, -1, 1];

/// 反方向索引表（用于壁面反弹）
pub const INVERSE_DIRECTIONS: [usize; NUM_VECTORS] =
    [0, 2, 1, 4, 3, 6, 5, 8, 7, 10, 9, 12, 11, 14, 13];

/// 平衡权重：静止 2/9，轴向 1/9，对角 1/72
pub const EQUILIBRIUM_WEIGHTS: [f64; NUM_VECTORS] = [
    2.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 72.0,
    1.0 / 72.0,
    1.0 / 72.0,
    1.0 / 72.0,
    1.0 / 72.0,
    1.0 / 72.0,
    1.0 / 72.0,
    1.0 / 72.0,
];

/// 计算平衡分布
///
/// `momentum` 为动量 `ρu`。返回 15 个平衡布居。
#[inline]
pub fn calculate_feq(density: f64, momentum: DVec3) -> [f64; NUM_VECTORS] {
    let density_1 = 1.0 / density;
    let p_sq = momentum.length_squared();

    let mut f_eq = [0.0; NUM_VECTORS];

    f_eq[0] = (2.0 / 9.0) * density - (1.0 / 3.0) * p_sq * density_1;

    let axis_base = (1.0 / 9.0) * density - (1.0 / 6.0) * p_sq * density_1;

    f_eq[1] = (axis_base + (0.5 * density_1) * momentum.x * momentum.x)
        + (1.0 / 3.0) * momentum.x;
    f_eq[2] = (axis_base + (0.5 * density_1) * momentum.x * momentum.x)
        - (1.0 / 3.0) * momentum.x;

    f_eq[3] = (axis_base + (0.5 * density_1) * momentum.y * momentum.y)
        + (1.0 / 3.0) * momentum.y;
    f_eq[4] = (axis_base + (0.5 * density_1) * momentum.y * momentum.y)
        - (1.0 / 3.0) * momentum.y;

    f_eq[5] = (axis_base + (0.5 * density_1) * momentum.z * momentum.z)
        + (1.0 / 3.0) * momentum.z;
    f_eq[6] = (axis_base + (0.5 * density_1) * momentum.z * momentum.z)
        - (1.0 / 3.0) * momentum.z;

    let diag_base = axis_base * (1.0 / 8.0);

    let s = momentum.x + momentum.y + momentum.z;
    f_eq[7] = (diag_base + (1.0 / 16.0) * density_1 * s * s) + (1.0 / 24.0) * s;
    f_eq[8] = (diag_base + (1.0 / 16.0) * density_1 * s * s) - (1.0 / 24.0) * s;

    let s = momentum.x + momentum.y - momentum.z;
    f_eq[9] = (diag_base + (1.0 / 16.0) * density_1 * s * s) + (1.0 / 24.0) * s;
    f_eq[10] = (diag_base + (1.0 / 16.0) * density_1 * s * s) - (1.0 / 24.0) * s;

    let s = momentum.x - momentum.y + momentum.z;
    f_eq[11] = (diag_base + (1.0 / 16.0) * density_1 * s * s) + (1.0 / 24.0) * s;
    f_eq[12] = (diag_base + (1.0 / 16.0) * density_1 * s * s) - (1.0 / 24.0) * s;

    let s = momentum.x - momentum.y - momentum.z;
    f_eq[13] = (diag_base + (1.0 / 16.0) * density_1 * s * s) + (1.0 / 24.0) * s;
    f_eq[14] = (diag_base + (1.0 / 16.0) * density_1 * s * s) - (1.0 / 24.0) * s;

    f_eq
}

/// 从 15 个布居计算密度与动量
#[inline]
pub fn calculate_density_and_momentum(f: &[f64]) -> (f64, DVec3) {
    debug_assert!(f.len() >= NUM_VECTORS);

    let density = f[0]
        + f[1]
        + f[2]
        + f[3]
        + f[4]
        + f[5]
        + f[6]
        + f[7]
        + f[8]
        + f[9]
        + f[10]
        + f[11]
        + f[12]
        + f[13]
        + f[14];

    let px = f[1] - f[2] + f[7] - f[8] + f[9] - f[10] + f[11] - f[12] + f[13] - f[14];
    let py = f[3] - f[4] + f[7] - f[8] + f[9] - f[10] - f[11] + f[12] - f[13] + f[14];
    let pz = f[5] - f[6] + f[7] - f[8] - f[9] + f[10] + f[11] - f[12] - f[13] + f[14];

    (density, DVec3::new(px, py, pz))
}

/// 热循环用的融合变体：一次遍历得到密度、动量和平衡分布
#[inline]
pub fn calculate_density_momentum_feq(f: &[f64]) -> (f64, DVec3, [f64; NUM_VECTORS]) {
    let (density, momentum) = calculate_density_and_momentum(f);
    (density, momentum, calculate_feq(density, momentum))
}

/// 从非平衡部分估算 von Mises 有效应力
///
/// `f_neq = f - feq`，`stress_parameter` 见 `LbmParameters`。
#[inline]
pub fn calculate_von_mises_stress(f_neq: &[f64; NUM_VECTORS], stress_parameter: f64) -> f64 {
    let sigma_xx_yy = (f_neq[1] + f_neq[2]) - (f_neq[3] + f_neq[4]);
    let sigma_yy_zz = (f_neq[3] + f_neq[4]) - (f_neq[5] + f_neq[6]);
    let sigma_xx_zz = (f_neq[1] + f_neq[2]) - (f_neq[5] + f_neq[6]);

    let sigma_xy = (f_neq[7] + f_neq[8]) + (f_neq[9] + f_neq[10])
        - (f_neq[11] + f_neq[12])
        - (f_neq[13] + f_neq[14]);
    let sigma_xz = (f_neq[7] + f_neq[8]) - (f_neq[9] + f_neq[10]) + (f_neq[11] + f_neq[12])
        - (f_neq[13] + f_neq[14]);
    let sigma_yz = (f_neq[7] + f_neq[8]) - (f_neq[9] + f_neq[10]) - (f_neq[11] + f_neq[12])
        + (f_neq[13] + f_neq[14]);

    let a = sigma_xx_yy * sigma_xx_yy + sigma_yy_zz * sigma_yy_zz + sigma_xx_zz * sigma_xx_zz;
    let b = sigma_xy * sigma_xy + sigma_xz * sigma_xz + sigma_yz * sigma_yz;

    stress_parameter * (a + 6.0 * b).sqrt()
}

// ============================================================
// 测试
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_inverse_directions_are_opposite() {
        for dir in 0..NUM_VECTORS {
            let inv = INVERSE_DIRECTIONS[dir];
            assert_eq!(CX[dir], -CX[inv]);
            assert_eq!(CY[dir], -CY[inv]);
            assert_eq!(CZ[dir], -CZ[inv]);
            assert_eq!(INVERSE_DIRECTIONS[inv], dir);
        }
    }

    #[test]
    fn test_rest_equilibrium_matches_weights() {
        // 密度 1、零动量时平衡分布即离散权重，且总和为 1
        let f_eq = calculate_feq(1.0, DVec3::ZERO);

        for dir in 0..NUM_VECTORS {
            assert_relative_eq!(f_eq[dir], EQUILIBRIUM_WEIGHTS[dir], max_relative = 1e-14);
        }

        let sum: f64 = f_eq.iter().sum();
        assert_relative_eq!(sum, 1.0, max_relative = 1e-14);
    }

    #[test]
    fn test_feq_moments_roundtrip() {
        let density = 1.013;
        let momentum = DVec3::new(0.021, -0.007, 0.004);

        let f_eq = calculate_feq(density, momentum);
        let (rho, p) = calculate_density_and_momentum(&f_eq);

        assert_relative_eq!(rho, density, max_relative = 1e-12);
        assert_relative_eq!(p.x, momentum.x, max_relative = 1e-10);
        assert_relative_eq!(p.y, momentum.y, max_relative = 1e-10);
        assert_relative_eq!(p.z, momentum.z, max_relative = 1e-10);
    }

    #[test]
    fn test_fused_variant_matches_separate_calls() {
        let f: Vec<f64> = (0..NUM_VECTORS).map(|i| 0.06 + 0.001 * i as f64).collect();

        let (rho, p, f_eq) = calculate_density_momentum_feq(&f);
        let (rho_ref, p_ref) = calculate_density_and_momentum(&f);
        let f_eq_ref = calculate_feq(rho_ref, p_ref);

        assert_relative_eq!(rho, rho_ref, max_relative = 1e-14);
        assert!((p - p_ref).length() < 1e-14);
        for dir in 0..NUM_VECTORS {
            assert_relative_eq!(f_eq[dir], f_eq_ref[dir], max_relative = 1e-14);
        }
    }

    #[test]
    fn test_equilibrium_has_zero_stress() {
        // 平衡场的非平衡部分为零向量
        let f_neq = [0.0; NUM_VECTORS];

        let stress = calculate_von_mises_stress(&f_neq, 0.3);
        assert_relative_eq!(stress, 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_stress_positive_off_equilibrium() {
        let mut f_neq = [0.0; NUM_VECTORS];
        f_neq[1] = 0.01;
        f_neq[2] = 0.01;

        let stress = calculate_von_mises_stress(&f_neq, 0.3);
        assert!(stress > 0.0);
    }
}
