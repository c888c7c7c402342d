//! # 输出文件写入
//!
//! 统一处理目录创建与已存在文件的跳过/覆盖。
//!
//! ## 依赖关系
//! - 被 `commands/process.rs`, `commands/decrypt.rs` 使用

use crate::error::{Result, SecureTransError};

use std::fs;
use std::path::Path;

/// 写入结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    Written,
    Skipped,
}

/// 写入文件，必要时创建父目录
///
/// 目标已存在且不允许覆盖时跳过。
pub fn write_output(path: &Path, content: &[u8], overwrite: bool) -> Result<WriteStatus> {
    if path.exists() && !overwrite {
        return Ok(WriteStatus::Skipped);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| SecureTransError::FileWriteError {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    fs::write(path, content).map_err(|e| SecureTransError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(WriteStatus::Written)
}
