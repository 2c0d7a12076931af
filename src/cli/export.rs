//! # export 子命令 CLI 定义
//!
//! 从张量包导出生成的材料 (.xyz / .cif)
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/export.rs`

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 支持的输出格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// XYZ format (cartesian coordinates)
    Xyz,
    /// Crystallographic Information File (fractional coordinates, P1)
    Cif,
}

impl OutputFormat {
    /// 文件扩展名
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Xyz => "xyz",
            OutputFormat::Cif => "cif",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// export 子命令参数
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Tensor bundle written by the generative model (.safetensors or .json)
    #[arg(
        long = "eval_gen_path",
        visible_alias = "eval-gen-path",
        env = "GENSAMPLE_EVAL_GEN_PATH"
    )]
    pub eval_gen_path: PathBuf,

    /// Existing directory that receives the crystal<id> files
    #[arg(
        long = "output_path",
        visible_alias = "output-path",
        env = "GENSAMPLE_OUTPUT_PATH"
    )]
    pub output_path: PathBuf,

    /// Number of materials to export, starting from material 0
    #[arg(
        long = "num_materials_export",
        visible_alias = "num-materials-export",
        default_value_t = 1
    )]
    pub num_materials_export: usize,

    /// Output structure format
    #[arg(
        long = "output_format",
        visible_alias = "output-format",
        value_enum,
        default_value = "xyz"
    )]
    pub output_format: OutputFormat,

    /// Sample batch to export from
    #[arg(long = "batch_index", visible_alias = "batch-index", default_value_t = 0)]
    pub batch_index: usize,

    /// Slice materials on exact atom-count boundaries instead of the legacy cumsum-1 offsets
    #[arg(long = "exact_segments", visible_alias = "exact-segments", default_value_t = false)]
    pub exact_segments: bool,

    /// Skip writing PYMATGEN_crystal<id>.cif and the cross-check against it
    #[arg(
        long = "no_reference_cif",
        visible_alias = "no-reference-cif",
        default_value_t = false
    )]
    pub no_reference_cif: bool,

    /// Number of parallel writers (0 = auto)
    #[arg(short, long, default_value_t = 1)]
    pub jobs: usize,
}
