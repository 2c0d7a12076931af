//! # 结构写出模块
//!
//! 将单个材料格式化为 XYZ / CIF 文本。
//!
//! ## 依赖关系
//! - 被 `commands/export.rs` 使用
//! - 使用 `models/` 数据模型
//! - 子模块: xyz, cif

pub mod cif;
pub mod xyz;

pub use cif::{to_cif_string, to_reference_cif_string};
pub use xyz::to_xyz_string;
