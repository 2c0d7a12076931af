//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `export`: 导出生成的晶体结构
//! - `inspect`: 查看张量包摘要
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: export, inspect

pub mod export;
pub mod inspect;

use clap::{Parser, Subcommand};

/// gensample - 生成模型晶体样本导出工具
#[derive(Parser)]
#[command(name = "gensample")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Export generated crystal structures to XYZ/CIF", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Export generated materials from a tensor bundle as .xyz or .cif files
    Export(export::ExportArgs),

    /// Summarize the materials contained in a tensor bundle
    Inspect(inspect::InspectArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_export_defaults() {
        let cli = Cli::try_parse_from([
            "gensample",
            "export",
            "--eval_gen_path",
            "eval_gen.safetensors",
            "--output_path",
            "out/",
        ])
        .unwrap();

        match cli.command {
            Commands::Export(args) => {
                assert_eq!(args.num_materials_export, 1);
                assert_eq!(args.output_format, export::OutputFormat::Xyz);
                assert_eq!(args.batch_index, 0);
                assert_eq!(args.jobs, 1);
                assert!(!args.exact_segments);
                assert!(!args.no_reference_cif);
            }
            _ => panic!("expected export command"),
        }
    }

    #[test]
    fn test_cli_export_kebab_aliases() {
        let cli = Cli::try_parse_from([
            "gensample",
            "export",
            "--eval-gen-path",
            "eval_gen.json",
            "--output-path",
            "out",
            "--num-materials-export",
            "4",
            "--output-format",
            "cif",
        ])
        .unwrap();

        match cli.command {
            Commands::Export(args) => {
                assert_eq!(args.num_materials_export, 4);
                assert_eq!(args.output_format, export::OutputFormat::Cif);
            }
            _ => panic!("expected export command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        let result = Cli::try_parse_from([
            "gensample",
            "export",
            "--eval_gen_path",
            "eval_gen.json",
            "--output_path",
            "out",
            "--output_format",
            "pdb",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_inspect() {
        let cli =
            Cli::try_parse_from(["gensample", "inspect", "eval_gen.json", "--limit", "5"]).unwrap();

        match cli.command {
            Commands::Inspect(args) => {
                assert_eq!(args.limit, 5);
                assert!(args.csv.is_none());
            }
            _ => panic!("expected inspect command"),
        }
    }
}
