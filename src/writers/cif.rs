//! # CIF 写出
//!
//! 两种写法：
//! - `to_cif_string`: 固定模板，P1、三斜，晶胞参数直接取自张量包的 lengths/angles，
//!   原子标签为 `Atom<i>`，分数坐标保留 9 位小数。
//! - `to_reference_cif_string`: 由独立构造的 Crystal 写出的参考 CIF
//!   （pymatgen CifWriter 布局），晶胞参数由晶格矩阵重新计算，用于交叉校验。
//!
//! ## 依赖关系
//! - 被 `commands/export.rs` 调用
//! - 使用 `models/bundle.rs` 的 Material, `models/structure.rs` 的 Crystal

use crate::error::Result;
use crate::models::{Crystal, Material};

/// 将材料转换为模板 CIF
pub fn to_cif_string(material: &Material<'_>) -> Result<String> {
    let symbols = material.symbols()?;
    let [a, b, c] = material.lengths;
    let [alpha, beta, gamma] = material.angles;

    let mut result = String::new();
    result.push_str(&format!("data_crystal{}\n", material.id));
    result.push_str("_symmetry_space_group_name_H-M   'P 1'\n");
    result.push_str("_symmetry_Int_Tables_number      1\n");
    result.push_str("_symmetry_cell_setting           triclinic\n");

    result.push_str(&format!("_cell_length_a                   {:.9}\n", a));
    result.push_str(&format!("_cell_length_b                   {:.9}\n", b));
    result.push_str(&format!("_cell_length_c                   {:.9}\n", c));
    result.push_str(&format!("_cell_angle_alpha                {:.9}\n", alpha));
    result.push_str(&format!("_cell_angle_beta                 {:.9}\n", beta));
    result.push_str(&format!("_cell_angle_gamma                {:.9}\n\n", gamma));

    result.push_str("loop_\n");
    result.push_str("_atom_site_label\n");
    result.push_str("_atom_site_type_symbol\n");
    result.push_str("_atom_site_fract_x\n");
    result.push_str("_atom_site_fract_y\n");
    result.push_str("_atom_site_fract_z\n");

    for (i, (symbol, frac)) in symbols
        .iter()
        .zip(material.frac_coords.iter())
        .enumerate()
    {
        result.push_str(&format!(
            "Atom{} {} {:.9} {:.9} {:.9}\n",
            i, symbol, frac[0], frac[1], frac[2]
        ));
    }

    Ok(result)
}

/// 将独立构造的晶体结构转换为参考 CIF
pub fn to_reference_cif_string(crystal: &Crystal) -> String {
    let (a, b, c, alpha, beta, gamma) = crystal.lattice.parameters();
    let formula = crystal.formula();

    let mut result = String::new();
    result.push_str(&format!("data_{}\n", formula));
    result.push_str("_symmetry_space_group_name_H-M   'P 1'\n");
    result.push_str(&format!("_cell_length_a   {:.8}\n", a));
    result.push_str(&format!("_cell_length_b   {:.8}\n", b));
    result.push_str(&format!("_cell_length_c   {:.8}\n", c));
    result.push_str(&format!("_cell_angle_alpha   {:.8}\n", alpha));
    result.push_str(&format!("_cell_angle_beta   {:.8}\n", beta));
    result.push_str(&format!("_cell_angle_gamma   {:.8}\n", gamma));
    result.push_str("_symmetry_Int_Tables_number   1\n");
    result.push_str(&format!("_chemical_formula_structural   {}\n", formula));
    result.push_str(&format!("_chemical_formula_sum   '{}'\n", crystal.formula_sum()));
    result.push_str(&format!(
        "_cell_volume   {:.8}\n",
        crystal.lattice.volume().abs()
    ));
    result.push_str("_cell_formula_units_Z   1\n");

    result.push_str("loop_\n");
    result.push_str(" _symmetry_equiv_pos_site_id\n");
    result.push_str(" _symmetry_equiv_pos_as_xyz\n");
    result.push_str("  1  'x, y, z'\n");

    result.push_str("loop_\n");
    result.push_str(" _atom_site_type_symbol\n");
    result.push_str(" _atom_site_label\n");
    result.push_str(" _atom_site_symmetry_multiplicity\n");
    result.push_str(" _atom_site_fract_x\n");
    result.push_str(" _atom_site_fract_y\n");
    result.push_str(" _atom_site_fract_z\n");
    result.push_str(" _atom_site_occupancy\n");

    for (i, atom) in crystal.atoms.iter().enumerate() {
        let label = atom
            .label
            .clone()
            .unwrap_or_else(|| format!("{}{}", atom.element, i + 1));
        result.push_str(&format!(
            "  {}  {}  1  {:.8}  {:.8}  {:.8}  1\n",
            atom.element, label, atom.position[0], atom.position[1], atom.position[2]
        ));
    }

    result
}
