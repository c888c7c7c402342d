//! # process 命令实现
//!
//! 收集输入文件并运行完整的批处理流水线。
//!
//! ## 功能
//! - 按 include/exclude 模式选择文件
//! - 可选批量重命名
//! - 每个条目一个进度条，实时打印运行日志
//! - 按原始相对目录写出结果，写出合并归档与 CSV 清单
//!
//! ## 依赖关系
//! - 使用 `cli/process.rs` 定义的参数
//! - 使用 `batch/`, `convert/`, `crypto.rs`
//! - 使用 `utils/output.rs`, `utils/progress.rs`, `utils/files.rs`

use crate::archive::ARCHIVE_EXTENSION;
use crate::batch::collector::parse_patterns;
use crate::batch::{BatchEvent, BatchProcessor, BatchQueue, BatchSession, FileCollector};
use crate::cli::process::{InputArgs, NamingArgs, ProcessArgs};
use crate::convert::media::SimulatedTranscoder;
use crate::convert::raster::{ImageBackend, ImageTarget};
use crate::convert::FormatConverter;
use crate::crypto::Encryptor;
use crate::error::{Result, SecureTransError};
use crate::models::{
    ConversionOptions, EncryptionOptions, ItemStatus, MediaCategory, ProcessedResult, QueuedItem,
};
use crate::rename;
use crate::utils::files::{self, WriteStatus};
use crate::utils::{output, progress};

use indicatif::{MultiProgress, ProgressBar};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tabled::{Table, Tabled};
use tracing::info;

/// 结果表格行
#[derive(Debug, Clone, Tabled)]
struct ResultRow {
    #[tabled(rename = "File")]
    file: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Output")]
    output: String,
    #[tabled(rename = "Size")]
    size: String,
}

/// 执行 process 命令
pub fn execute(args: ProcessArgs) -> Result<()> {
    output::print_header("Processing files");

    let mut options = build_options(&args.naming)?;
    if options.encryption.enabled {
        options.encryption.passphrase = require_password(args.password.as_deref())?;
    }
    let items = load_items(&args.input)?;

    let converter = FormatConverter::new(
        ImageBackend::new(args.max_dimension, args.max_size_kb.saturating_mul(1024)),
        Box::new(SimulatedTranscoder::new(Duration::from_millis(args.simulate_ms))),
    );
    let mut session =
        BatchSession::new(BatchProcessor::new(Box::new(converter), Encryptor::default()));
    session.load(items)?;
    prepare_queue(session.queue_mut(), &args.input, &args.naming)?;

    let selected = session.queue().selected_count();
    let total_bytes: usize = session.queue().items().iter().map(|item| item.size()).sum();
    output::print_info(&format!(
        "Found {} file(s) ({} bytes), {} selected, target format '{}'",
        session.queue().len(),
        total_bytes,
        selected,
        options.target_format
    ));

    let multi = MultiProgress::new();
    let overall = multi.add(progress::create_progress_bar(selected as u64, "Processing"));
    let mut bars: HashMap<String, ProgressBar> = HashMap::new();

    let summary = session.start(&options, |event, queue| match event {
        BatchEvent::RunStarted { total } => overall.set_length(*total as u64),
        BatchEvent::Log(entry) => multi.suspend(|| output::print_log(entry)),
        BatchEvent::Status { id, status } => match status {
            ItemStatus::Converting => {
                let name = queue
                    .get(id)
                    .map(|item| item.name.as_str())
                    .unwrap_or(id.as_str());
                let bar = multi.insert_before(&overall, progress::create_item_bar(name));
                bars.insert(id.clone(), bar);
            }
            ItemStatus::Encrypting => {
                if let Some(bar) = bars.get(id) {
                    bar.set_message("encrypting");
                }
            }
            ItemStatus::Done => {
                if let Some(bar) = bars.remove(id) {
                    bar.finish_with_message("done");
                }
                overall.inc(1);
            }
            _ => {}
        },
        BatchEvent::Progress { id, progress } => {
            if let Some(bar) = bars.get(id) {
                bar.set_position(u64::from(*progress));
            }
        }
        BatchEvent::Failed { id, .. } => {
            if let Some(bar) = bars.remove(id) {
                bar.abandon_with_message("failed");
            }
            overall.inc(1);
        }
        BatchEvent::ArchiveReady { bytes } => multi.suspend(|| {
            output::print_info(&format!("Combined archive ready ({} bytes)", bytes))
        }),
        BatchEvent::RunFinished { succeeded, failed } => {
            overall.finish_with_message(format!("{} done, {} failed", succeeded, failed))
        }
    })?;

    let results = session.processor().results();
    output::print_separator();
    write_results(&results, &args.output, args.overwrite)?;

    if !args.no_archive {
        if let Some(bytes) = session.processor().archive() {
            let path = args
                .output
                .join(format!("{}.{}", args.archive_name, ARCHIVE_EXTENSION));
            match files::write_output(&path, &bytes, args.overwrite)? {
                WriteStatus::Written => output::print_success(&format!(
                    "Archive written to '{}' ({} bytes)",
                    path.display(),
                    bytes.len()
                )),
                WriteStatus::Skipped => output::print_skip(&format!(
                    "{} already exists (use --overwrite)",
                    path.display()
                )),
            }
        }
    }

    if let Some(manifest) = &args.manifest {
        write_manifest(manifest, &results)?;
        output::print_success(&format!("Manifest written to '{}'", manifest.display()));
    }

    let rows = result_rows(session.queue(), &results);
    println!("\n{}", Table::new(&rows));

    if !summary.failures.is_empty() {
        let names: Vec<&str> = summary.failures.iter().map(|(name, _)| name.as_str()).collect();
        output::print_warning(&format!(
            "{} file(s) failed: {}",
            summary.failed,
            names.join(", ")
        ));
    }

    info!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        "process command finished"
    );
    output::print_done(&format!(
        "Processed {} file(s): {} succeeded, {} failed, output in '{}'",
        summary.total(),
        summary.succeeded,
        summary.failed,
        args.output.display()
    ));

    Ok(())
}

/// 根据命令行参数构造转换选项（口令另行设置）
pub(crate) fn build_options(naming: &NamingArgs) -> Result<ConversionOptions> {
    for (flag, value) in [("--prefix", &naming.prefix), ("--suffix", &naming.suffix)] {
        if value.contains(['/', '\\']) {
            return Err(SecureTransError::InvalidArgument(format!(
                "{} must not contain path separators",
                flag
            )));
        }
    }

    let options = ConversionOptions {
        target_format: naming.format.clone(),
        prefix: naming.prefix.clone(),
        suffix: naming.suffix.clone(),
        encryption: EncryptionOptions {
            enabled: naming.encrypt,
            passphrase: String::new(),
        },
    };

    if let Some(target) = options.target() {
        if !is_known_format(&target) {
            return Err(SecureTransError::UnsupportedFormat(naming.format.clone()));
        }
    }

    Ok(options)
}

/// 加密所需口令，不能为空
fn require_password(password: Option<&str>) -> Result<String> {
    match password {
        Some(p) if !p.is_empty() => Ok(p.to_string()),
        _ => Err(SecureTransError::InvalidArgument(
            "--encrypt requires --password or SECURETRANS_PASSWORD".to_string(),
        )),
    }
}

/// 目标格式是否被任一大类或图像编码器支持
fn is_known_format(target: &str) -> bool {
    ImageTarget::for_format(target).is_some()
        || MediaCategory::all()
            .iter()
            .any(|category| category.supported_formats().iter().any(|(value, _)| *value == target))
}

/// 收集并读取输入文件
pub(crate) fn load_items(input: &InputArgs) -> Result<Vec<QueuedItem>> {
    let collector = FileCollector::new(input.inputs.clone())
        .with_pattern(&input.include)?
        .recursive(!input.shallow);

    let spinner = progress::create_spinner("Reading files...");
    let items = collector.load_items();
    spinner.finish_and_clear();

    let items = items?;
    if items.is_empty() {
        return Err(SecureTransError::NoFilesFound {
            pattern: input.include.clone(),
        });
    }
    Ok(items)
}

/// 应用 exclude 取消选择与批量重命名
pub(crate) fn prepare_queue(
    queue: &mut BatchQueue,
    input: &InputArgs,
    naming: &NamingArgs,
) -> Result<()> {
    if let Some(exclude) = &input.exclude {
        let patterns = parse_patterns(exclude)?;
        let excluded: Vec<String> = queue
            .items()
            .iter()
            .filter(|item| patterns.iter().any(|p| p.matches(&item.name)))
            .map(|item| item.id.clone())
            .collect();
        for id in &excluded {
            queue.set_selected(id, false);
        }
    }

    if let Some(pattern) = &naming.pattern {
        if !rename::uses_index(pattern) && queue.selected_count() > 1 {
            output::print_warning(&format!(
                "Pattern '{}' has no {{i}} placeholder; selected files may share a name",
                pattern
            ));
        }
        let renamed = queue.batch_rename(pattern);
        info!(renamed, pattern = %pattern, "batch rename applied");
    }
    Ok(())
}

/// 结果在输出目录中的路径
fn result_path(output_dir: &Path, result: &ProcessedResult) -> PathBuf {
    let mut path = output_dir.to_path_buf();
    for segment in result.folder_segments() {
        path.push(segment);
    }
    path.push(&result.final_name);
    path
}

/// 按原始相对目录写出所有结果
fn write_results(results: &[ProcessedResult], output_dir: &Path, overwrite: bool) -> Result<()> {
    for result in results {
        let path = result_path(output_dir, result);
        match files::write_output(&path, &result.content, overwrite)? {
            WriteStatus::Written => {
                output::print_written(&result.original_path, &path.display().to_string())
            }
            WriteStatus::Skipped => output::print_skip(&format!(
                "{} already exists (use --overwrite)",
                path.display()
            )),
        }
    }
    Ok(())
}

/// 写出 CSV 清单
fn write_manifest(path: &Path, results: &[ProcessedResult]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for result in results {
        wtr.serialize(result.manifest_row())?;
    }
    wtr.flush().map_err(|e| SecureTransError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(())
}

fn result_rows(queue: &BatchQueue, results: &[ProcessedResult]) -> Vec<ResultRow> {
    let by_id: HashMap<&str, &ProcessedResult> =
        results.iter().map(|r| (r.id.as_str(), r)).collect();

    queue
        .selected()
        .into_iter()
        .map(|item| {
            let result = by_id.get(item.id.as_str());
            ResultRow {
                file: item.original_path.clone(),
                status: item.status.to_string(),
                output: match (result, &item.error_message) {
                    (Some(r), _) => r.final_name.clone(),
                    (None, Some(message)) => message.clone(),
                    (None, None) => "-".to_string(),
                },
                size: result
                    .map(|r| format!("{} B", r.content.len()))
                    .unwrap_or_else(|| "-".to_string()),
            }
        })
        .collect()
}
