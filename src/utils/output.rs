//! # 终端输出
//!
//! 统一的彩色前缀输出，导出进度条期间的警告也走这里。
//!
//! ## 依赖关系
//! - 被 `main.rs` 与 `commands/` 使用
//! - 使用 `colored` crate

use colored::Colorize;

const RULE_WIDTH: usize = 60;

pub fn print_success(msg: &str) {
    println!("{} {}", "[OK]".green().bold(), msg);
}

/// 错误写到 stderr
pub fn print_error(msg: &str) {
    eprintln!("{} {}", "[ERR]".red().bold(), msg);
}

pub fn print_warning(msg: &str) {
    println!("{} {}", "[WARN]".yellow().bold(), msg);
}

pub fn print_info(msg: &str) {
    println!("{} {}", "[*]".blue().bold(), msg);
}

pub fn print_done(msg: &str) {
    println!("{} {}", "[DONE]".green().bold(), msg);
}

/// 键值对，键左对齐
pub fn print_field(key: &str, value: impl std::fmt::Display) {
    println!("  {:<18} {}", format!("{}:", key).dimmed(), value);
}

/// 命令开始时的标题栏
pub fn print_header(title: &str) {
    let rule = "─".repeat(RULE_WIDTH);
    println!("\n{}\n  {}\n{}\n", rule.dimmed(), title.bold(), rule.dimmed());
}
