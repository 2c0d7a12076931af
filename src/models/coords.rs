//! # 坐标转换
//!
//! 将一个批次内所有原子的分数坐标转换为笛卡尔坐标。
//! 每个材料的晶格按其原子数重复，输出与输入逐一对应。
//!
//! ## 依赖关系
//! - 被 `commands/export.rs` 调用
//! - 使用 `models/structure.rs` 的 Lattice

use crate::error::{GenSampleError, Result};
use crate::models::Lattice;

/// 批量分数坐标转笛卡尔坐标
pub fn frac_to_cart_coords(
    frac_coords: &[[f64; 3]],
    lengths: &[[f64; 3]],
    angles: &[[f64; 3]],
    num_atoms: &[usize],
) -> Result<Vec<[f64; 3]>> {
    if lengths.len() != num_atoms.len() || angles.len() != num_atoms.len() {
        return Err(GenSampleError::InvalidBundle(format!(
            "{} materials but {} lengths and {} angles",
            num_atoms.len(),
            lengths.len(),
            angles.len()
        )));
    }

    let total: usize = num_atoms.iter().sum();
    if total != frac_coords.len() {
        return Err(GenSampleError::InvalidBundle(format!(
            "num_atoms sums to {} but {} fractional coordinates given",
            total,
            frac_coords.len()
        )));
    }

    let mut cart = Vec::with_capacity(frac_coords.len());
    let mut offset = 0;

    for ((len, ang), &n) in lengths.iter().zip(angles.iter()).zip(num_atoms.iter()) {
        let lattice = Lattice::from_lengths_and_angles(*len, *ang);
        cart.extend(
            frac_coords[offset..offset + n]
                .iter()
                .map(|&frac| lattice.frac_to_cart(frac)),
        );
        offset += n;
    }

    Ok(cart)
}
