//! # XYZ 写出
//!
//! 第一行原子数，第二行留空，其后每行 `<元素> <x> <y> <z>`，
//! 笛卡尔坐标保留 9 位小数。
//!
//! ## 依赖关系
//! - 被 `commands/export.rs` 调用
//! - 使用 `models/bundle.rs` 的 Material

use crate::error::Result;
use crate::models::Material;

/// 将材料转换为 XYZ 格式
pub fn to_xyz_string(material: &Material<'_>) -> Result<String> {
    let symbols = material.symbols()?;

    let mut result = String::new();
    result.push_str(&format!("{}\n\n", symbols.len()));

    for (symbol, cart) in symbols.iter().zip(material.cart_coords.iter()) {
        result.push_str(&format!(
            "{} {:.9} {:.9} {:.9}\n",
            symbol, cart[0], cart[1], cart[2]
        ));
    }

    Ok(result)
}
