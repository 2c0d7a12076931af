//! # CIF 格式解析器
//!
//! 读取 P1 CIF 文本中的晶胞参数与原子位置，用于交叉校验。
//! 同时支持导出的模板 CIF 与参考 CIF 两种写法。
//!
//! ## 支持的字段
//! ```text
//! data_<name>
//! _cell_length_a / _b / _c
//! _cell_angle_alpha / _beta / _gamma
//! loop_ 中的 _atom_site_label / _atom_site_type_symbol / _atom_site_fract_x/y/z
//! ```
//!
//! ## 依赖关系
//! - 被 `commands/export.rs` 的交叉校验使用
//! - 使用 `models/structure.rs`
//! - 使用 `regex` crate

use crate::error::{GenSampleError, Result};
use crate::models::{Atom, Crystal, Lattice};

use regex::Regex;
use std::sync::LazyLock;

static DATA_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*data_(\S+)").unwrap());

static CELL_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^\s*_cell_(length_a|length_b|length_c|angle_alpha|angle_beta|angle_gamma)\s+([-+0-9.eE]+)",
    )
    .unwrap()
});

/// 从字符串内容解析 CIF 格式
pub fn parse_cif_content(content: &str, default_name: &str) -> Result<Crystal> {
    let parse_error = |reason: String| GenSampleError::ParseError {
        format: "cif".to_string(),
        path: default_name.to_string(),
        reason,
    };

    let name = DATA_BLOCK
        .captures(content)
        .map(|c| c[1].to_string())
        .unwrap_or_else(|| default_name.to_string());

    // 晶胞参数
    let mut cell: [Option<f64>; 6] = [None; 6];
    for caps in CELL_FIELD.captures_iter(content) {
        let idx = match &caps[1] {
            "length_a" => 0,
            "length_b" => 1,
            "length_c" => 2,
            "angle_alpha" => 3,
            "angle_beta" => 4,
            _ => 5,
        };
        let value: f64 = caps[2]
            .parse()
            .map_err(|_| parse_error(format!("Invalid cell value '{}'", &caps[2])))?;
        cell[idx] = Some(value);
    }

    let mut params = [0.0; 6];
    for (i, value) in cell.iter().enumerate() {
        params[i] = value.ok_or_else(|| parse_error("Missing cell parameter".to_string()))?;
    }

    let lattice =
        Lattice::from_parameters(params[0], params[1], params[2], params[3], params[4], params[5]);
    let atoms = parse_atom_sites(content, &parse_error)?;

    Ok(Crystal::new(name, lattice, atoms))
}

/// 解析 `_atom_site_*` loop
fn parse_atom_sites(
    content: &str,
    parse_error: &dyn Fn(String) -> GenSampleError,
) -> Result<Vec<Atom>> {
    let lines: Vec<&str> = content.lines().map(str::trim).collect();
    let mut i = 0;

    while i < lines.len() {
        if !lines[i].eq_ignore_ascii_case("loop_") {
            i += 1;
            continue;
        }

        // 收集 loop 表头
        let mut headers: Vec<&str> = Vec::new();
        let mut j = i + 1;
        while j < lines.len() && lines[j].starts_with('_') {
            headers.push(lines[j]);
            j += 1;
        }

        let column = |key: &str| headers.iter().position(|h| *h == key);
        let (Some(fx), Some(fy), Some(fz)) = (
            column("_atom_site_fract_x"),
            column("_atom_site_fract_y"),
            column("_atom_site_fract_z"),
        ) else {
            i = j;
            continue;
        };
        let symbol_col = column("_atom_site_type_symbol");
        let label_col = column("_atom_site_label");

        let mut atoms = Vec::new();
        while j < lines.len() {
            let line = lines[j];
            if line.is_empty()
                || line.starts_with('_')
                || line.starts_with('#')
                || line.eq_ignore_ascii_case("loop_")
                || line.starts_with("data_")
            {
                break;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < headers.len() {
                return Err(parse_error(format!(
                    "Atom site row has {} fields, expected {}",
                    parts.len(),
                    headers.len()
                )));
            }

            let coord = |col: usize| -> Result<f64> {
                parts[col]
                    .parse()
                    .map_err(|_| parse_error(format!("Invalid coordinate '{}'", parts[col])))
            };
            let position = [coord(fx)?, coord(fy)?, coord(fz)?];

            let label = label_col.map(|c| parts[c].to_string());
            let element = match (symbol_col, &label) {
                (Some(c), _) => parts[c].to_string(),
                (None, Some(l)) => l
                    .chars()
                    .take_while(|ch| ch.is_ascii_alphabetic())
                    .collect(),
                (None, None) => {
                    return Err(parse_error(
                        "Atom site loop has neither label nor type symbol".to_string(),
                    ))
                }
            };

            let atom = Atom::new(element, position);
            atoms.push(match label {
                Some(l) => atom.with_label(l),
                None => atom,
            });
            j += 1;
        }

        return Ok(atoms);
    }

    Err(parse_error("No _atom_site loop found".to_string()))
}
