//! # 文件收集器
//!
//! 根据输入路径和模式收集待处理文件，并读取为队列条目。
//!
//! ## 功能
//! - 支持单文件与目录输入（可混合多个）
//! - glob 模式匹配（逗号分隔多模式）
//! - 目录输入保留相对路径，形如 `folder/sub/file.txt`
//! - 并行读取文件内容，条目顺序与收集顺序一致
//!
//! ## 依赖关系
//! - 被 `commands/` 调用
//! - 使用 `walkdir` 遍历目录，`glob` 匹配文件名，`rayon` 并行读取

use crate::error::{Result, SecureTransError};
use crate::models::QueuedItem;

use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use walkdir::WalkDir;

/// 收集到的文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedFile {
    /// 磁盘路径
    pub path: PathBuf,
    /// 相对路径（目录输入时包含目录名）
    pub relative_path: String,
}

/// 文件收集器
pub struct FileCollector {
    /// 输入路径
    inputs: Vec<PathBuf>,
    /// 匹配模式列表
    patterns: Vec<glob::Pattern>,
    /// 是否递归
    recursive: bool,
}

impl FileCollector {
    /// 创建新的文件收集器
    pub fn new(inputs: Vec<PathBuf>) -> Self {
        Self {
            inputs,
            patterns: Vec::new(),
            recursive: true,
        }
    }

    /// 设置匹配模式（逗号分隔的多模式）
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self> {
        self.patterns = parse_patterns(pattern)?;
        Ok(self)
    }

    /// 设置是否递归搜索
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// 收集所有匹配的文件
    pub fn collect(&self) -> Result<Vec<CollectedFile>> {
        let mut files = Vec::new();

        for input in &self.inputs {
            if input.is_file() {
                let name = file_name_of(input);
                if self.matches(&name) {
                    files.push(CollectedFile {
                        path: input.clone(),
                        relative_path: name,
                    });
                }
            } else if input.is_dir() {
                self.collect_dir(input, &mut files);
            } else {
                return Err(SecureTransError::FileNotFound {
                    path: input.display().to_string(),
                });
            }
        }

        Ok(files)
    }

    fn collect_dir(&self, dir: &Path, files: &mut Vec<CollectedFile>) {
        let root_name = file_name_of(dir);
        let max_depth = if self.recursive { usize::MAX } else { 1 };

        let walker = WalkDir::new(dir)
            .max_depth(max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file());

        for entry in walker {
            let name = entry.file_name().to_string_lossy().to_string();
            if !self.matches(&name) {
                continue;
            }

            let inner = entry
                .path()
                .strip_prefix(dir)
                .map(|p| {
                    p.components()
                        .map(|c| c.as_os_str().to_string_lossy().to_string())
                        .collect::<Vec<_>>()
                        .join("/")
                })
                .unwrap_or_else(|_| name.clone());

            let relative_path = if root_name.is_empty() {
                inner
            } else {
                format!("{}/{}", root_name, inner)
            };

            files.push(CollectedFile {
                path: entry.path().to_path_buf(),
                relative_path,
            });
        }
    }

    /// 检查文件名是否匹配任一模式（无模式时全部匹配）
    fn matches(&self, name: &str) -> bool {
        self.patterns.is_empty() || self.patterns.iter().any(|p| p.matches(name))
    }

    /// 收集并读取为队列条目
    pub fn load_items(&self) -> Result<Vec<QueuedItem>> {
        let files = self.collect()?;
        files
            .par_iter()
            .enumerate()
            .map(|(index, file)| read_item(file, index))
            .collect()
    }
}

/// 解析逗号分隔的 glob 模式
pub fn parse_patterns(pattern: &str) -> Result<Vec<glob::Pattern>> {
    pattern
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "*")
        .map(|s| {
            glob::Pattern::new(s).map_err(|e| SecureTransError::InvalidPattern {
                pattern: s.to_string(),
                reason: e.to_string(),
            })
        })
        .collect()
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// 读取单个文件为队列条目
///
/// ID 由文件名、修改时间与位置组成，区分同名文件。
fn read_item(file: &CollectedFile, index: usize) -> Result<QueuedItem> {
    let content = fs::read(&file.path).map_err(|e| SecureTransError::FileReadError {
        path: file.path.display().to_string(),
        source: e,
    })?;

    let name = file_name_of(&file.path);
    let modified_ms = fs::metadata(&file.path)
        .and_then(|m| m.modified())
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_millis())
        .unwrap_or(0);

    let id = format!("{}-{}-{}", name, modified_ms, index);
    Ok(QueuedItem::new(id, name, file.relative_path.clone(), content))
}
