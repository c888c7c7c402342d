//! # 批量执行器
//!
//! 按队列顺序逐个处理选中条目：转换 → 命名 →（可选）加密 → 收集结果，
//! 全部完成后在结果多于一个时生成合并归档。
//!
//! ## 功能
//! - 严格串行：条目 N 的所有事件先于条目 N+1
//! - 单条失败只记录在该条目上，批次继续
//! - 运行标志原子地检查并设置，拒绝重入
//! - 归档失败只放弃归档，已完成的单个结果保留
//!
//! ## 依赖关系
//! - 被 `batch/session.rs` 调用
//! - 使用 `convert/`, `crypto.rs`, `archive.rs`, `batch/events.rs`

use super::events::{emit, BatchEvent, LogEntry};
use crate::archive::{self, ArchiveEntry};
use crate::convert::Convert;
use crate::crypto::{Encryptor, ENCRYPTED_SUFFIX};
use crate::error::{Result, SecureTransError};
use crate::models::media::OCTET_STREAM;
use crate::models::{ConversionOptions, ItemStatus, ProcessedResult, QueuedItem};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// 单次运行结果统计
#[derive(Debug, Default, Clone)]
pub struct RunSummary {
    /// 成功数量
    pub succeeded: usize,
    /// 失败数量
    pub failed: usize,
    /// 失败详情 (文件名, 错误信息)
    pub failures: Vec<(String, String)>,
    /// 合并归档大小
    pub archive_bytes: Option<usize>,
}

impl RunSummary {
    /// 总处理数量
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    fn record_failure(&mut self, name: &str, message: &str) {
        self.failed += 1;
        self.failures.push((name.to_string(), message.to_string()));
    }
}

#[derive(Debug, Default)]
struct RunState {
    logs: Vec<LogEntry>,
    results: Vec<ProcessedResult>,
    archive: Option<Vec<u8>>,
}

/// 运行标志守卫，离开作用域时复位
struct ProcessingGuard<'a>(&'a AtomicBool);

impl<'a> ProcessingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| SecureTransError::AlreadyProcessing)?;
        Ok(ProcessingGuard(flag))
    }
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// 计算条目的最终文件名（不含 `.enc`）
///
/// `prefix + (自定义基础名 || 原始基础名) + suffix`，
/// 扩展名优先级：自定义扩展名 > 目标格式 > 原始扩展名。
pub fn final_name(item: &QueuedItem, options: &ConversionOptions) -> String {
    let base = item
        .custom_name
        .as_deref()
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| item.base_name());
    let final_base = format!("{}{}{}", options.prefix, base, options.suffix);

    let extension = match &item.custom_extension {
        Some(ext) => Some(ext.clone()),
        None => options
            .target()
            .or_else(|| item.original_extension().map(str::to_string)),
    };

    match extension.filter(|ext| !ext.is_empty()) {
        Some(ext) => format!("{}.{}", final_base, ext),
        None => final_base,
    }
}

/// 计算条目的输出文件名（启用加密时带 `.enc`）
pub fn output_name(item: &QueuedItem, options: &ConversionOptions) -> String {
    let name = final_name(item, options);
    if options.encryption.enabled {
        format!("{}{}", name, ENCRYPTED_SUFFIX)
    } else {
        name
    }
}

/// 批量执行器
pub struct BatchProcessor {
    converter: Box<dyn Convert>,
    encryptor: Encryptor,
    processing: AtomicBool,
    state: Mutex<RunState>,
}

impl BatchProcessor {
    /// 创建新的批量执行器
    pub fn new(converter: Box<dyn Convert>, encryptor: Encryptor) -> Self {
        BatchProcessor {
            converter,
            encryptor,
            processing: AtomicBool::new(false),
            state: Mutex::new(RunState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, RunState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::Acquire)
    }

    /// 累积的处理结果
    pub fn results(&self) -> Vec<ProcessedResult> {
        self.state().results.clone()
    }

    /// 合并归档（结果多于一个且归档成功时存在）
    pub fn archive(&self) -> Option<Vec<u8>> {
        self.state().archive.clone()
    }

    /// 运行日志
    pub fn logs(&self) -> Vec<LogEntry> {
        self.state().logs.clone()
    }

    /// 清空结果、归档与日志
    ///
    /// 运行中拒绝清空；运行标志只由 `ProcessingGuard` 释放。
    pub fn clear(&self) -> Result<()> {
        if self.is_processing() {
            return Err(SecureTransError::AlreadyProcessing);
        }
        let mut state = self.state();
        state.logs.clear();
        state.results.clear();
        state.archive = None;
        Ok(())
    }

    fn log(&self, events: &Sender<BatchEvent>, message: impl Into<String>) {
        let entry = LogEntry::now(message);
        debug!(message = %entry.message, "run log");
        self.state().logs.push(entry.clone());
        emit(events, BatchEvent::Log(entry));
    }

    /// 串行处理所有选中条目
    pub fn run(
        &self,
        items: &[QueuedItem],
        options: &ConversionOptions,
        events: &Sender<BatchEvent>,
    ) -> Result<RunSummary> {
        let selected: Vec<&QueuedItem> = items.iter().filter(|item| item.selected).collect();
        if selected.is_empty() {
            return Err(SecureTransError::NothingSelected);
        }

        let _guard = ProcessingGuard::acquire(&self.processing)?;
        {
            let mut state = self.state();
            state.results.clear();
            state.archive = None;
        }

        info!(
            items = selected.len(),
            target = %options.target_format,
            encrypt = options.encryption.enabled,
            "batch run started"
        );
        emit(events, BatchEvent::RunStarted { total: selected.len() });
        self.log(events, "Starting file processing...");

        let mut summary = RunSummary::default();
        for item in selected {
            match self.process_item(item, options, events) {
                Ok(result) => {
                    emit(
                        events,
                        BatchEvent::Status {
                            id: item.id.clone(),
                            status: ItemStatus::Done,
                        },
                    );
                    self.state().results.push(result);
                    summary.succeeded += 1;
                }
                Err(e) => {
                    let message = e.to_string();
                    warn!(name = %item.name, error = %message, "item failed");
                    emit(
                        events,
                        BatchEvent::Failed {
                            id: item.id.clone(),
                            message: message.clone(),
                        },
                    );
                    self.log(events, format!("Error processing {}: {}", item.name, message));
                    summary.record_failure(&item.name, &message);
                }
            }
        }

        self.log(events, "All files processed.");

        if summary.succeeded > 1 {
            summary.archive_bytes = self.build_archive(events);
        }

        info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            "batch run finished"
        );
        emit(
            events,
            BatchEvent::RunFinished {
                succeeded: summary.succeeded,
                failed: summary.failed,
            },
        );
        Ok(summary)
    }

    /// 处理单个条目
    fn process_item(
        &self,
        item: &QueuedItem,
        options: &ConversionOptions,
        events: &Sender<BatchEvent>,
    ) -> Result<ProcessedResult> {
        emit(
            events,
            BatchEvent::Status {
                id: item.id.clone(),
                status: ItemStatus::Converting,
            },
        );
        self.log(events, format!("Processing {}...", item.name));

        let converted = self.converter.convert(item, options, &mut |progress| {
            emit(
                events,
                BatchEvent::Progress {
                    id: item.id.clone(),
                    progress,
                },
            );
        })?;
        self.log(events, format!("Converted {}.", item.name));
        emit(
            events,
            BatchEvent::Progress {
                id: item.id.clone(),
                progress: 100,
            },
        );

        let mut name = final_name(item, options);
        let mut content = converted.content;
        let mut media_type = converted.media_type;

        if options.encryption.enabled {
            emit(
                events,
                BatchEvent::Status {
                    id: item.id.clone(),
                    status: ItemStatus::Encrypting,
                },
            );
            self.log(events, format!("Encrypting {}...", name));
            content = self
                .encryptor
                .encrypt(&content, &options.encryption.passphrase)?;
            name.push_str(ENCRYPTED_SUFFIX);
            media_type = OCTET_STREAM.to_string();
            self.log(events, format!("Encrypted {}.", name));
        }

        Ok(ProcessedResult {
            id: item.id.clone(),
            original_name: item.name.clone(),
            final_name: name,
            content,
            media_type,
            original_path: item.original_path.clone(),
        })
    }

    /// 生成合并归档，失败时记录日志并返回 `None`
    fn build_archive(&self, events: &Sender<BatchEvent>) -> Option<usize> {
        self.log(events, "Creating archive...");

        let built = {
            let state = self.state();
            let entries: Vec<ArchiveEntry<'_>> =
                state.results.iter().map(ArchiveEntry::from).collect();
            archive::build_archive(&entries)
        };

        match built {
            Ok(bytes) => {
                let size = bytes.len();
                self.state().archive = Some(bytes);
                emit(events, BatchEvent::ArchiveReady { bytes: size });
                self.log(events, "Archive ready for download.");
                Some(size)
            }
            Err(e) => {
                warn!(error = %e, "archive creation failed");
                self.log(events, format!("Archive creation failed: {}", e));
                None
            }
        }
    }
}
