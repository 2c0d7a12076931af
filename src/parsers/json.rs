//! # JSON 张量包解析器
//!
//! 张量包的 JSON 形式，键与 safetensors 相同，值为嵌套数组：
//! ```text
//! {
//!   "num_atoms":   [[2]],
//!   "atom_types":  [[1, 8]],
//!   "frac_coords": [[[0.0, 0.0, 0.0], [0.5, 0.5, 0.5]]],
//!   "lengths":     [[[5.0, 5.0, 5.0]]],
//!   "angles":      [[[90.0, 90.0, 90.0]]]
//! }
//! ```
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `serde_json`

use crate::error::{GenSampleError, Result};
use crate::models::GenerationBundle;

use std::fs;
use std::path::Path;

/// 解析 .json 张量包
pub fn parse_json_file(path: &Path) -> Result<GenerationBundle> {
    let content = fs::read_to_string(path).map_err(|e| GenSampleError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_json_content(&content, &path.display().to_string())
}

/// 从字符串内容解析
pub fn parse_json_content(content: &str, name: &str) -> Result<GenerationBundle> {
    serde_json::from_str(content).map_err(|e| GenSampleError::ParseError {
        format: "json".to_string(),
        path: name.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_bundle() {
        let content = r#"{
            "num_atoms": [[2, 1]],
            "atom_types": [[1, 8, 26]],
            "frac_coords": [[[0.0, 0.0, 0.0], [0.5, 0.5, 0.5], [0.25, 0.25, 0.25]]],
            "lengths": [[[5.0, 5.0, 5.0], [2.87, 2.87, 2.87]]],
            "angles": [[[90.0, 90.0, 90.0], [90.0, 90.0, 90.0]]]
        }"#;
        let bundle = parse_json_content(content, "memory").unwrap();

        assert_eq!(bundle.num_batches(), 1);
        assert_eq!(bundle.num_atoms[0], vec![2, 1]);
        assert_eq!(bundle.atom_types[0][2], 26);
        assert_eq!(bundle.lengths[0][1], [2.87, 2.87, 2.87]);
        assert!(bundle.validate().is_ok());
    }

    #[test]
    fn test_parse_json_missing_key() {
        let content = r#"{"num_atoms": [[1]], "atom_types": [[1]]}"#;
        let result = parse_json_content(content, "memory");
        assert!(matches!(result, Err(GenSampleError::ParseError { .. })));
    }

    #[test]
    fn test_parse_json_bad_triple() {
        let content = r#"{
            "num_atoms": [[1]],
            "atom_types": [[1]],
            "frac_coords": [[[0.0, 0.0]]],
            "lengths": [[[5.0, 5.0, 5.0]]],
            "angles": [[[90.0, 90.0, 90.0]]]
        }"#;
        let result = parse_json_content(content, "memory");
        assert!(matches!(result, Err(GenSampleError::ParseError { .. })));
    }
}
