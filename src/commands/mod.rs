//! # 命令执行模块
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `parsers/`, `models/`, `writers/`, `utils/`
//! - 子模块: export, inspect

pub mod export;
pub mod inspect;

use crate::cli::Commands;
use crate::error::Result;

/// 分发子命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Export(args) => export::execute(args),
        Commands::Inspect(args) => inspect::execute(args),
    }
}
