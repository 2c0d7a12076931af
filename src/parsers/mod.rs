//! # 解析器模块
//!
//! 提供生成张量包的加载器，以及导出结构文本 (XYZ / CIF) 的回读解析器。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: safetensors, json, cif, xyz

pub mod cif;
pub mod json;
pub mod safetensors;
pub mod xyz;

use crate::error::{GenSampleError, Result};
use crate::models::GenerationBundle;
use std::path::Path;

/// 从文件路径推断格式并加载张量包（已校验）
pub fn load_bundle(path: &Path) -> Result<GenerationBundle> {
    if !path.is_file() {
        return Err(GenSampleError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    let bundle = match ext.as_str() {
        "safetensors" => safetensors::parse_safetensors_file(path)?,
        "json" => json::parse_json_file(path)?,
        "pt" | "pth" => {
            return Err(GenSampleError::UnsupportedFormat(format!(
                "{} is a PyTorch pickle; re-save it with safetensors.torch.save_file",
                path.display()
            )))
        }
        _ => {
            return Err(GenSampleError::UnsupportedFormat(format!(
                "Cannot determine bundle format for: {}",
                path.display()
            )))
        }
    };

    bundle.validate()?;
    Ok(bundle)
}
