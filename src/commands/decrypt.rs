//! # decrypt 命令实现
//!
//! 解密 `.enc` 文件，去掉后缀后写到输出目录，保留相对目录。
//!
//! ## 依赖关系
//! - 使用 `cli/decrypt.rs` 定义的参数
//! - 使用 `batch/collector.rs`, `crypto.rs`
//! - 使用 `utils/output.rs`, `utils/progress.rs`, `utils/files.rs`

use crate::batch::FileCollector;
use crate::cli::decrypt::DecryptArgs;
use crate::crypto::{strip_encrypted_suffix, Encryptor, ENCRYPTED_SUFFIX};
use crate::error::{Result, SecureTransError};
use crate::models::QueuedItem;
use crate::utils::files::{self, WriteStatus};
use crate::utils::{output, progress};

use std::path::{Path, PathBuf};
use tracing::warn;

/// 执行 decrypt 命令
pub fn execute(args: DecryptArgs) -> Result<()> {
    output::print_header("Decrypting files");

    let pattern = format!("*{}", ENCRYPTED_SUFFIX);
    let items = FileCollector::new(args.inputs.clone())
        .with_pattern(&pattern)?
        .load_items()?;

    if items.is_empty() {
        return Err(SecureTransError::NoFilesFound { pattern });
    }
    output::print_info(&format!("Found {} encrypted file(s)", items.len()));

    let encryptor = Encryptor::default();
    let pb = progress::create_progress_bar(items.len() as u64, "Decrypting");
    let mut decrypted = 0;
    let mut skipped = 0;
    let mut failed = 0;

    for item in &items {
        match decrypt_item(&encryptor, item, &args.password, &args.output, args.overwrite) {
            Ok(Some(WriteStatus::Written)) => decrypted += 1,
            Ok(Some(WriteStatus::Skipped)) => {
                skipped += 1;
                pb.suspend(|| {
                    output::print_skip(&format!("{} (output exists)", item.original_path))
                });
            }
            Ok(None) => skipped += 1,
            Err(e) => {
                failed += 1;
                warn!(path = %item.original_path, error = %e, "decryption failed");
                pb.suspend(|| output::print_error(&format!("{}: {}", item.original_path, e)));
            }
        }
        pb.inc(1);
    }

    pb.finish_with_message("Done");
    output::print_done(&format!(
        "Decrypted {} file(s) into '{}' ({} skipped, {} failed)",
        decrypted,
        args.output.display(),
        skipped,
        failed
    ));
    Ok(())
}

/// 解密单个文件，名称没有有效 `.enc` 后缀时返回 `None`
fn decrypt_item(
    encryptor: &Encryptor,
    item: &QueuedItem,
    password: &str,
    output_dir: &Path,
    overwrite: bool,
) -> Result<Option<WriteStatus>> {
    let Some(path) = decrypted_path(output_dir, &item.original_path) else {
        return Ok(None);
    };
    let plain = encryptor.decrypt(&item.content, password)?;
    files::write_output(&path, &plain, overwrite).map(Some)
}

/// 输出路径：相对路径的目录段 + 去掉 `.enc` 的文件名
fn decrypted_path(output_dir: &Path, relative_path: &str) -> Option<PathBuf> {
    let mut segments: Vec<&str> = relative_path.split('/').filter(|s| !s.is_empty()).collect();
    let file_name = strip_encrypted_suffix(segments.pop()?)?;

    let mut path = output_dir.to_path_buf();
    for segment in segments {
        path.push(segment);
    }
    path.push(file_name);
    Some(path)
}
