// apps/hf_cli/src/duct.rs

//! 演示用直管格子
//!
//! 构建 W×H×L 的长方体管道域：z=0 截面为入口、z=L−1 截面为
//! 出口、四周外圈为壁面，其余为体相流体。单进程，全部站点为
//! inner，无共享 halo。
//!
//! 这是应用层的演示/测试脚手架；真实运行中域布局来自外部的
//! 几何分区服务。

use hf_physics::lattice::{CX, CY, CZ, INVERSE_DIRECTIONS, NUM_VECTORS};
use hf_physics::{CollisionKind, DomainLayout, StreamTarget};

/// 构建直管布局
///
/// `width`/`height` 为横截面尺寸，`length` 为流向（z）长度，
/// 三者都必须至少为 3（保证存在体相站点）。
pub fn build_duct_layout(width: usize, height: usize, length: usize) -> DomainLayout {
    assert!(width >= 3 && height >= 3 && length >= 3, "管道每维至少 3 个站点");

    let classify = |x: usize, y: usize, z: usize| -> CollisionKind {
        let lateral = x == 0 || x == width - 1 || y == 0 || y == height - 1;
        if z == 0 {
            if lateral {
                CollisionKind::InletWall
            } else {
                CollisionKind::Inlet
            }
        } else if z == length - 1 {
            if lateral {
                CollisionKind::OutletWall
            } else {
                CollisionKind::Outlet
            }
        } else if lateral {
            CollisionKind::Wall
        } else {
            CollisionKind::MidFluid
        }
    };

    // 站点按分类连续分区存放：先收集坐标，再按分类索引稳定排序
    let mut positions = Vec::with_capacity(width * height * length);
    for z in 0..length {
        for y in 0..height {
            for x in 0..width {
                positions.push((x, y, z));
            }
        }
    }
    positions.sort_by_key(|&(x, y, z)| classify(x, y, z).index());

    let site_count = positions.len();
    let mut site_of = vec![0usize; site_count];
    for (site, &(x, y, z)) in positions.iter().enumerate() {
        site_of[(z * height + y) * width + x] = site;
    }

    let mut inner_counts = [0usize; CollisionKind::COUNT];
    for &(x, y, z) in &positions {
        inner_counts[classify(x, y, z).index()] += 1;
    }

    // 流动映射：目标在域内 → 邻居同方向槽位；出域 → 本站点反弹。
    // 进/出口截面离域的方向同样按反弹处理，下一步即被边界规则覆盖。
    let mut stream_targets = Vec::with_capacity(site_count * NUM_VECTORS);
    for (site, &(x, y, z)) in positions.iter().enumerate() {
        for dir in 0..NUM_VECTORS {
            let nx = x as i64 + CX[dir] as i64;
            let ny = y as i64 + CY[dir] as i64;
            let nz = z as i64 + CZ[dir] as i64;

            let inside = nx >= 0
                && nx < width as i64
                && ny >= 0
                && ny < height as i64
                && nz >= 0
                && nz < length as i64;

            let target = if inside {
                let flat = (nz as usize * height + ny as usize) * width + nx as usize;
                StreamTarget::Local(site_of[flat] * NUM_VECTORS + dir)
            } else {
                StreamTarget::Local(site * NUM_VECTORS + INVERSE_DIRECTIONS[dir])
            };
            stream_targets.push(target);
        }
    }

    DomainLayout {
        site_count,
        inner_counts,
        inter_counts: [0; CollisionKind::COUNT],
        stream_targets,
        boundary_ids: vec![0; site_count],
        shared_count: 0,
    }
}

// ============================================================
// 测试
// ============================================================
