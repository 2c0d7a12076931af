//! # 数据模型模块
//!
//! 定义生成张量包、材料分段与晶体结构数据模型。
//!
//! ## 依赖关系
//! - 被 `parsers/`, `writers/` 和 `commands/` 使用
//! - 子模块: bundle, coords, elements, segment, structure

pub mod bundle;
pub mod coords;
pub mod elements;
pub mod segment;
pub mod structure;

pub use bundle::{GenerationBundle, Material};
pub use segment::SegmentMode;
pub use structure::{Atom, Crystal, Lattice};
