//! # 统一错误处理模块
//!
//! 定义 SecureTrans 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// SecureTrans 统一错误类型
#[derive(Error, Debug)]
pub enum SecureTransError {
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

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 流水线错误
    // ─────────────────────────────────────────────────────────────
    #[error("Conversion of {name} to {target} failed: {reason}")]
    ConversionError {
        name: String,
        target: String,
        reason: String,
    },

    #[error("Encryption failed: {0}")]
    EncryptionError(String),

    #[error("Decryption failed: {0}")]
    DecryptionError(String),

    #[error("Archive entry '{path}' rejected: {reason}")]
    ArchiveError { path: String, reason: String },

    // ─────────────────────────────────────────────────────────────
    // 运行状态错误
    // ─────────────────────────────────────────────────────────────
    #[error("Please select at least one file to process.")]
    NothingSelected,

    #[error("A batch is already being processed")]
    AlreadyProcessing,

    #[error("No matching files found with pattern: {pattern}")]
    NoFilesFound { pattern: String },

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid glob pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

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

impl SecureTransError {
    /// 构造转换错误
    pub fn conversion(name: &str, target: &str, reason: impl ToString) -> Self {
        SecureTransError::ConversionError {
            name: name.to_string(),
            target: target.to_string(),
            reason: reason.to_string(),
        }
    }

    /// 构造归档错误
    pub fn archive(path: &str, reason: impl ToString) -> Self {
        SecureTransError::ArchiveError {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, SecureTransError>;
