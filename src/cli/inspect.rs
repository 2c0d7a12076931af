//! # inspect 子命令 CLI 定义
//!
//! 打印张量包中材料的摘要表
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/inspect.rs`

use clap::Args;
use std::path::PathBuf;

/// inspect 子命令参数
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Tensor bundle written by the generative model (.safetensors or .json)
    pub input: PathBuf,

    /// Sample batch to summarize
    #[arg(long = "batch_index", visible_alias = "batch-index", default_value_t = 0)]
    pub batch_index: usize,

    /// Number of materials shown in the terminal table
    #[arg(long, default_value_t = 20)]
    pub limit: usize,

    /// Write the full per-material summary to this CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,
}
