//! # 元素周期表
//!
//! 原子序数 → 元素符号查找表 (Z = 1..=118)。
//!
//! ## 依赖关系
//! - 被 `models/bundle.rs`, `writers/` 使用
//! - 纯静态数据，无外部依赖

use crate::error::{GenSampleError, Result};

use std::collections::HashMap;
use std::sync::LazyLock;

/// 按原子序数排列的元素符号，下标 0 对应 Z = 1
const ELEMENT_SYMBOLS: [&str; 118] = [
    // 第 1 周期
    "H", "He",
    // 第 2 周期
    "Li", "Be", "B", "C", "N", "O", "F", "Ne",
    // 第 3 周期
    "Na", "Mg", "Al", "Si", "P", "S", "Cl", "Ar",
    // 第 4 周期
    "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As", "Se",
    "Br", "Kr",
    // 第 5 周期
    "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In", "Sn", "Sb", "Te",
    "I", "Xe",
    // 第 6 周期
    "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb", "Dy", "Ho", "Er", "Tm", "Yb",
    "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl", "Pb", "Bi", "Po", "At", "Rn",
    // 第 7 周期
    "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk", "Cf", "Es", "Fm", "Md", "No",
    "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn", "Nh", "Fl", "Mc", "Lv", "Ts", "Og",
];

/// 原子序数 → 元素符号
pub static ATOMIC_SYMBOLS: LazyLock<HashMap<i64, &'static str>> = LazyLock::new(|| {
    ELEMENT_SYMBOLS
        .iter()
        .enumerate()
        .map(|(i, &symbol)| (i as i64 + 1, symbol))
        .collect()
});

/// 查找原子序数对应的元素符号
pub fn symbol(atomic_number: i64) -> Result<&'static str> {
    ATOMIC_SYMBOLS
        .get(&atomic_number)
        .copied()
        .ok_or(GenSampleError::UnknownAtomicNumber(atomic_number))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_lookup() {
        assert_eq!(symbol(1).unwrap(), "H");
        assert_eq!(symbol(8).unwrap(), "O");
        assert_eq!(symbol(26).unwrap(), "Fe");
        assert_eq!(symbol(79).unwrap(), "Au");
        assert_eq!(symbol(92).unwrap(), "U");
        assert_eq!(symbol(118).unwrap(), "Og");
    }

    #[test]
    fn test_table_covers_all_elements() {
        assert_eq!(ATOMIC_SYMBOLS.len(), 118);
    }

    #[test]
    fn test_unknown_atomic_number() {
        assert!(matches!(
            symbol(0),
            Err(GenSampleError::UnknownAtomicNumber(0))
        ));
        assert!(matches!(
            symbol(119),
            Err(GenSampleError::UnknownAtomicNumber(119))
        ));
    }
}
