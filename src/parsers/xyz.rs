//! # XYZ 格式解析器
//!
//! 读取导出的 XYZ 文本，用于交叉校验与回读测试。
//!
//! ## XYZ 格式说明
//! ```text
//! n                  # atom count
//! comment            # may be blank
//! El x y z           # cartesian coordinates (Å)
//! ...
//! ```
//!
//! ## 依赖关系
//! - 被 `commands/export.rs` 的交叉校验使用

use crate::error::{GenSampleError, Result};

/// XYZ 中的一行原子记录
#[derive(Debug, Clone, PartialEq)]
pub struct XyzAtom {
    pub element: String,
    pub position: [f64; 3],
}

/// 从字符串内容解析 XYZ 格式
pub fn parse_xyz_content(content: &str, name: &str) -> Result<Vec<XyzAtom>> {
    let parse_error = |reason: String| GenSampleError::ParseError {
        format: "xyz".to_string(),
        path: name.to_string(),
        reason,
    };

    let mut lines = content.lines();

    let count: usize = lines
        .next()
        .ok_or_else(|| parse_error("Empty XYZ file".to_string()))?
        .trim()
        .parse()
        .map_err(|_| parse_error("Invalid atom count".to_string()))?;

    // 注释行
    lines.next();

    let mut atoms = Vec::with_capacity(count);
    for (i, line) in lines.filter(|l| !l.trim().is_empty()).enumerate() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(parse_error(format!("Atom line {} has fewer than 4 fields", i + 1)));
        }

        let mut position = [0.0; 3];
        for (k, value) in parts[1..4].iter().enumerate() {
            position[k] = value
                .parse()
                .map_err(|_| parse_error(format!("Invalid coordinate '{}'", value)))?;
        }

        atoms.push(XyzAtom {
            element: parts[0].to_string(),
            position,
        });
    }

    if atoms.len() != count {
        return Err(parse_error(format!(
            "Header declares {} atoms but {} found",
            count,
            atoms.len()
        )));
    }

    Ok(atoms)
}
