//! # 统一错误处理模块
//!
//! 定义 gensample 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// gensample 统一错误类型
#[derive(Error, Debug)]
pub enum GenSampleError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse {format} file: {path}\nReason: {reason}")]
    ParseError {
        format: String,
        path: String,
        reason: String,
    },

    #[error("Missing tensor '{key}' in bundle: {path}")]
    MissingTensor { key: String, path: String },

    #[error("Unsupported dtype {dtype} for tensor '{key}'")]
    UnsupportedDtype { key: String, dtype: String },

    #[error("Invalid generation bundle: {0}")]
    InvalidBundle(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    // ─────────────────────────────────────────────────────────────
    // 索引错误
    // ─────────────────────────────────────────────────────────────
    #[error("Batch index {index} out of range (bundle has {available} batch(es))")]
    BatchOutOfRange { index: usize, available: usize },

    #[error("Requested {requested} material(s) but only {available} available")]
    MaterialOutOfRange { requested: usize, available: usize },

    #[error("Unknown atomic number: {0}")]
    UnknownAtomicNumber(i64),

    // ─────────────────────────────────────────────────────────────
    // CSV 错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, GenSampleError>;
