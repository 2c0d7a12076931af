//! # export 命令实现
//!
//! 从生成张量包导出每个材料的结构文件。
//!
//! ## 流程
//! - 加载并校验张量包，选取批次
//! - 整批分数坐标一次性转换为笛卡尔坐标
//! - 由原子数计算材料分段（legacy / exact）
//! - 逐个材料写出 `crystal<id>.xyz|cif`
//! - 可选写出参考 `PYMATGEN_crystal<id>.cif` 并与主文件交叉校验
//!
//! ## 依赖关系
//! - 使用 `cli/export.rs` 定义的参数
//! - 使用 `parsers/`, `models/`, `writers/`
//! - 使用 `utils/output.rs`, `utils/progress.rs`

use crate::cli::export::{ExportArgs, OutputFormat};
use crate::error::{GenSampleError, Result};
use crate::models::{Crystal, GenerationBundle, Material, SegmentMode};
use crate::parsers::{self, cif::parse_cif_content, xyz::parse_xyz_content};
use crate::utils::{output, progress};
use crate::writers;

use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// 交叉校验容差
const CROSS_CHECK_TOLERANCE: f64 = 1e-5;

/// 导出选项
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub output_dir: PathBuf,
    pub num_materials: usize,
    pub format: OutputFormat,
    pub batch_index: usize,
    pub segment_mode: SegmentMode,
    pub reference_cif: bool,
    pub jobs: usize,
}

impl From<&ExportArgs> for ExportOptions {
    fn from(args: &ExportArgs) -> Self {
        ExportOptions {
            output_dir: args.output_path.clone(),
            num_materials: args.num_materials_export,
            format: args.output_format,
            batch_index: args.batch_index,
            segment_mode: if args.exact_segments {
                SegmentMode::Exact
            } else {
                SegmentMode::Legacy
            },
            reference_cif: !args.no_reference_cif,
            jobs: args.jobs,
        }
    }
}

/// 单个材料的导出结果
#[derive(Debug, Clone)]
pub struct MaterialReport {
    pub id: usize,
    pub files_written: usize,
    /// 与参考结构不一致之处
    pub issues: Vec<String>,
}

/// 导出统计
#[derive(Debug, Default)]
pub struct ExportSummary {
    pub reports: Vec<MaterialReport>,
}

impl ExportSummary {
    pub fn files_written(&self) -> usize {
        self.reports.iter().map(|r| r.files_written).sum()
    }

    /// 交叉校验不一致的材料数
    pub fn mismatched(&self) -> usize {
        self.reports.iter().filter(|r| !r.issues.is_empty()).count()
    }
}

/// 执行 export 命令
pub fn execute(args: ExportArgs) -> Result<()> {
    output::print_header(&format!(
        "Exporting generated materials as {}",
        args.output_format
    ));

    let bundle = parsers::load_bundle(&args.eval_gen_path)?;
    output::print_info(&format!(
        "Loaded '{}' ({} batch(es))",
        args.eval_gen_path.display(),
        bundle.num_batches()
    ));

    let options = ExportOptions::from(&args);
    if options.segment_mode == SegmentMode::Legacy {
        output::print_warning(
            "Using legacy cumsum-1 segment offsets; pass --exact_segments for exact slicing",
        );
    }

    let summary = export_bundle(&bundle, &options)?;

    for report in summary.reports.iter().filter(|r| !r.issues.is_empty()) {
        for issue in &report.issues {
            output::print_warning(&format!("crystal{}: {}", report.id, issue));
        }
    }

    if options.reference_cif {
        let mismatched = summary.mismatched();
        if mismatched == 0 {
            output::print_success("All materials match their reference structures");
        } else {
            output::print_warning(&format!(
                "{} of {} material(s) differ from their reference structures",
                mismatched,
                summary.reports.len()
            ));
        }
    }

    output::print_done(&format!(
        "Wrote {} file(s) for {} material(s) to '{}'",
        summary.files_written(),
        summary.reports.len(),
        options.output_dir.display()
    ));

    Ok(())
}

/// 导出张量包中前 `num_materials` 个材料
pub fn export_bundle(bundle: &GenerationBundle, options: &ExportOptions) -> Result<ExportSummary> {
    if !options.output_dir.is_dir() {
        return Err(GenSampleError::DirectoryNotFound {
            path: options.output_dir.display().to_string(),
        });
    }

    let batch = bundle.batch(options.batch_index)?;
    let cart_coords = batch.cart_coords()?;
    let segments = batch.segments(options.segment_mode);

    if options.num_materials > segments.len() {
        return Err(GenSampleError::MaterialOutOfRange {
            requested: options.num_materials,
            available: segments.len(),
        });
    }

    let pb = progress::create_progress_bar(options.num_materials as u64, "Writing");

    let export_one = |id: usize| -> Result<MaterialReport> {
        let material = batch.material(id, &segments, &cart_coords)?;
        let report = export_material(&material, options)?;
        pb.inc(1);
        Ok(report)
    };

    let jobs = if options.jobs == 0 {
        num_cpus::get()
    } else {
        options.jobs
    };

    let reports = if jobs == 1 {
        (0..options.num_materials)
            .map(export_one)
            .collect::<Result<Vec<_>>>()?
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .map_err(|e| GenSampleError::Other(format!("Failed to build thread pool: {}", e)))?;

        pool.install(|| {
            (0..options.num_materials)
                .into_par_iter()
                .map(export_one)
                .collect::<Result<Vec<_>>>()
        })?
    };

    pb.finish_and_clear();

    Ok(ExportSummary { reports })
}

/// 写出单个材料（及其参考 CIF）
fn export_material(material: &Material<'_>, options: &ExportOptions) -> Result<MaterialReport> {
    let file_name = format!("crystal{}.{}", material.id, options.format.extension());
    let content = match options.format {
        OutputFormat::Xyz => writers::to_xyz_string(material)?,
        OutputFormat::Cif => writers::to_cif_string(material)?,
    };
    write_file(&options.output_dir.join(&file_name), &content)?;

    let mut report = MaterialReport {
        id: material.id,
        files_written: 1,
        issues: Vec::new(),
    };

    if options.reference_cif {
        let reference = material.to_crystal()?;
        let reference_path = options
            .output_dir
            .join(format!("PYMATGEN_crystal{}.cif", material.id));
        write_file(&reference_path, &writers::to_reference_cif_string(&reference))?;
        report.files_written += 1;

        report.issues = cross_check(options.format, &content, &reference, &file_name)?;
    }

    Ok(report)
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| GenSampleError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })
}

/// 将主文件内容与参考结构逐项比较
fn cross_check(
    format: OutputFormat,
    content: &str,
    reference: &Crystal,
    name: &str,
) -> Result<Vec<String>> {
    let mut issues = Vec::new();

    // (元素, 坐标) 对：XYZ 比较笛卡尔坐标，CIF 比较分数坐标
    let (written, expected): (Vec<(String, [f64; 3])>, Vec<[f64; 3]>) = match format {
        OutputFormat::Xyz => {
            let atoms = parse_xyz_content(content, name)?;
            (
                atoms.into_iter().map(|a| (a.element, a.position)).collect(),
                reference.cartesian_positions(),
            )
        }
        OutputFormat::Cif => {
            let parsed = parse_cif_content(content, name)?;

            let (a, b, c, alpha, beta, gamma) = parsed.lattice.parameters();
            let (ra, rb, rc, ralpha, rbeta, rgamma) = reference.lattice.parameters();
            let pairs = [
                ("a", a, ra),
                ("b", b, rb),
                ("c", c, rc),
                ("alpha", alpha, ralpha),
                ("beta", beta, rbeta),
                ("gamma", gamma, rgamma),
            ];
            for (field, value, expected) in pairs {
                if (value - expected).abs() > CROSS_CHECK_TOLERANCE {
                    issues.push(format!(
                        "cell {} is {:.6} but reference has {:.6}",
                        field, value, expected
                    ));
                }
            }

            (
                parsed
                    .atoms
                    .into_iter()
                    .map(|a| (a.element, a.position))
                    .collect(),
                reference.atoms.iter().map(|a| a.position).collect(),
            )
        }
    };

    if written.len() != reference.atoms.len() {
        issues.push(format!(
            "{} atoms written but reference has {}",
            written.len(),
            reference.atoms.len()
        ));
        return Ok(issues);
    }

    for (i, ((element, position), (atom, target))) in written
        .iter()
        .zip(reference.atoms.iter().zip(expected.iter()))
        .enumerate()
    {
        if *element != atom.element {
            issues.push(format!(
                "atom {} is {} but reference has {}",
                i, element, atom.element
            ));
        }

        let deviation = (0..3)
            .map(|k| (position[k] - target[k]).abs())
            .fold(0.0, f64::max);
        if deviation > CROSS_CHECK_TOLERANCE {
            issues.push(format!(
                "atom {} ({}) deviates from reference by {:.6}",
                i, element, deviation
            ));
        }
    }

    Ok(issues)
}
