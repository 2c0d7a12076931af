//! # gensample - 生成模型晶体样本导出工具
//!
//! 读取晶体生成模型 (CDVAE) 保存的张量包，将每个生成的材料写出为
//! XYZ 或 CIF 文件，并可选地生成参考 CIF 进行交叉校验。
//!
//! ## 子命令
//! - `export`  - 导出生成的结构 (.xyz, .cif)
//! - `inspect` - 查看张量包内容摘要
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── parsers/   (张量包与结构文本解析器)
//!   │     ├── writers/   (XYZ / CIF 写出)
//!   │     └── models/    (数据模型)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod cli;
mod commands;
mod error;
mod models;
mod parsers;
mod utils;
mod writers;

use clap::Parser;
use cli::Cli;

fn main() {
    // Windows 终端需要开启 ANSI 转义
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
