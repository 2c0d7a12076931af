//! # inspect 命令实现
//!
//! 打印张量包的批次与材料概况，按精确分段切片。
//!
//! ## 功能
//! - 批次数、选中批次的材料数与原子数
//! - 前 `limit` 个材料的终端表格
//! - 可选的完整 CSV 摘要
//!
//! ## 依赖关系
//! - 使用 `cli/inspect.rs` 定义的参数
//! - 使用 `parsers/`, `models/`
//! - 使用 `utils/output.rs`

use crate::cli::inspect::InspectArgs;
use crate::error::{GenSampleError, Result};
use crate::models::{GenerationBundle, SegmentMode};
use crate::parsers;
use crate::utils::output;

use serde::Serialize;
use std::path::Path;
use tabled::{Table, Tabled};

/// 单个材料的摘要
#[derive(Debug, Clone, Serialize)]
pub struct MaterialSummary {
    pub id: usize,
    pub name: String,
    pub formula: String,
    pub atoms: usize,
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    pub volume: f64,
}

/// 终端表格行
#[derive(Debug, Clone, Tabled)]
struct SummaryRow {
    #[tabled(rename = "ID")]
    id: usize,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Formula")]
    formula: String,
    #[tabled(rename = "Atoms")]
    atoms: usize,
    #[tabled(rename = "a (Å)")]
    a: String,
    #[tabled(rename = "b (Å)")]
    b: String,
    #[tabled(rename = "c (Å)")]
    c: String,
    #[tabled(rename = "α (°)")]
    alpha: String,
    #[tabled(rename = "β (°)")]
    beta: String,
    #[tabled(rename = "γ (°)")]
    gamma: String,
    #[tabled(rename = "Volume (Å³)")]
    volume: String,
}

impl From<&MaterialSummary> for SummaryRow {
    fn from(s: &MaterialSummary) -> Self {
        SummaryRow {
            id: s.id,
            name: s.name.clone(),
            formula: s.formula.clone(),
            atoms: s.atoms,
            a: format!("{:.4}", s.a),
            b: format!("{:.4}", s.b),
            c: format!("{:.4}", s.c),
            alpha: format!("{:.2}", s.alpha),
            beta: format!("{:.2}", s.beta),
            gamma: format!("{:.2}", s.gamma),
            volume: format!("{:.3}", s.volume),
        }
    }
}

/// 执行 inspect 命令
pub fn execute(args: InspectArgs) -> Result<()> {
    output::print_header("Inspecting Tensor Bundle");

    let bundle = parsers::load_bundle(&args.input)?;
    let batch = bundle.batch(args.batch_index)?;

    output::print_field("File", args.input.display());
    output::print_field("Batches", bundle.num_batches());
    output::print_field("Batch", batch.index);
    output::print_field("Materials", batch.num_materials());
    output::print_field("Atoms", batch.total_atoms());

    let summaries = summarize_batch(&bundle, args.batch_index)?;

    if summaries.is_empty() {
        output::print_warning("Selected batch contains no materials.");
        return Ok(());
    }

    let rows: Vec<SummaryRow> = summaries
        .iter()
        .take(args.limit)
        .map(SummaryRow::from)
        .collect();

    output::print_header(&format!(
        "First {} of {} Materials",
        rows.len(),
        summaries.len()
    ));
    println!("{}", Table::new(&rows));

    if let Some(ref csv_path) = args.csv {
        save_summary_csv(&summaries, csv_path)?;
        output::print_success(&format!(
            "Full summary saved to '{}'",
            csv_path.display()
        ));
    }

    Ok(())
}

/// 按精确分段汇总一个批次的全部材料
pub fn summarize_batch(bundle: &GenerationBundle, batch_index: usize) -> Result<Vec<MaterialSummary>> {
    let batch = bundle.batch(batch_index)?;
    let cart_coords = batch.cart_coords()?;
    let segments = batch.segments(SegmentMode::Exact);

    (0..segments.len())
        .map(|id| {
            let material = batch.material(id, &segments, &cart_coords)?;
            let crystal = material.to_crystal()?;
            let (a, b, c, alpha, beta, gamma) = crystal.lattice.parameters();

            Ok(MaterialSummary {
                id,
                name: crystal.name.clone(),
                formula: crystal.formula(),
                atoms: material.num_atoms(),
                a,
                b,
                c,
                alpha,
                beta,
                gamma,
                volume: crystal.lattice.volume().abs(),
            })
        })
        .collect()
}

fn save_summary_csv(summaries: &[MaterialSummary], output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path).map_err(GenSampleError::CsvError)?;

    for summary in summaries {
        wtr.serialize(summary).map_err(GenSampleError::CsvError)?;
    }

    wtr.flush().map_err(|e| GenSampleError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}
