//! # 归档器
//!
//! 将多个处理结果打包为单个 `.tar.gz`，保留原始相对目录结构。
//!
//! ## 规则
//! - 相对路径按 `/` 拆分，除最后一段外都是目录
//! - 每个目录前缀只创建一次
//! - 叶子文件使用最终文件名（而非原始文件名）
//! - 同一归档路径出现两次时，后者覆盖前者内容，位置保持不变
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 调用
//! - 使用 `tar`, `flate2`

use crate::error::{Result, SecureTransError};
use crate::models::ProcessedResult;

use flate2::write::GzEncoder;
use flate2::Compression;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// 归档文件扩展名
pub const ARCHIVE_EXTENSION: &str = "tar.gz";

/// 归档条目
#[derive(Debug, Clone)]
pub struct ArchiveEntry<'a> {
    /// 原始相对路径
    pub relative_path: &'a str,
    /// 最终文件名
    pub name: &'a str,
    pub content: &'a [u8],
}

impl<'a> From<&'a ProcessedResult> for ArchiveEntry<'a> {
    fn from(result: &'a ProcessedResult) -> Self {
        ArchiveEntry {
            relative_path: &result.original_path,
            name: &result.final_name,
            content: &result.content,
        }
    }
}

/// 归档布局中的节点
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveNode<'a> {
    Folder(String),
    File { path: String, content: &'a [u8] },
}

/// 计算归档布局（目录与文件的写入顺序）
pub fn plan<'a>(entries: &[ArchiveEntry<'a>]) -> Result<Vec<ArchiveNode<'a>>> {
    let mut nodes = Vec::new();
    let mut created_folders: HashSet<String> = HashSet::new();
    let mut file_slots: HashMap<String, usize> = HashMap::new();

    for entry in entries {
        validate_name(entry)?;

        let mut segments: Vec<&str> = entry
            .relative_path
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();
        segments.pop();

        let mut folder = String::new();
        for segment in segments {
            if segment == "." || segment == ".." || segment.contains('\\') {
                return Err(SecureTransError::archive(
                    entry.relative_path,
                    format!("invalid folder segment '{}'", segment),
                ));
            }
            if !folder.is_empty() {
                folder.push('/');
            }
            folder.push_str(segment);
            if created_folders.insert(folder.clone()) {
                nodes.push(ArchiveNode::Folder(folder.clone()));
            }
        }

        let path = if folder.is_empty() {
            entry.name.to_string()
        } else {
            format!("{}/{}", folder, entry.name)
        };

        match file_slots.get(&path) {
            Some(&slot) => {
                debug!(path = %path, "replacing duplicate archive entry");
                nodes[slot] = ArchiveNode::File {
                    path,
                    content: entry.content,
                };
            }
            None => {
                file_slots.insert(path.clone(), nodes.len());
                nodes.push(ArchiveNode::File {
                    path,
                    content: entry.content,
                });
            }
        }
    }

    Ok(nodes)
}

fn validate_name(entry: &ArchiveEntry<'_>) -> Result<()> {
    let name = entry.name;
    if name.is_empty() || name == "." || name == ".." || name.contains('/') || name.contains('\\') {
        return Err(SecureTransError::archive(
            entry.relative_path,
            format!("invalid file name '{}'", name),
        ));
    }
    Ok(())
}

/// 构建 `.tar.gz` 归档
pub fn build_archive(entries: &[ArchiveEntry<'_>]) -> Result<Vec<u8>> {
    let nodes = plan(entries)?;
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);

    for node in &nodes {
        match node {
            ArchiveNode::Folder(path) => {
                let mut header = tar::Header::new_gnu();
                header.set_entry_type(tar::EntryType::Directory);
                header.set_size(0);
                header.set_mode(0o755);
                header.set_mtime(0);
                header.set_uid(0);
                header.set_gid(0);
                builder
                    .append_data(&mut header, format!("{}/", path), std::io::empty())
                    .map_err(|e| SecureTransError::archive(path, e))?;
            }
            ArchiveNode::File { path, content } => {
                let mut header = tar::Header::new_gnu();
                header.set_entry_type(tar::EntryType::Regular);
                header.set_size(content.len() as u64);
                header.set_mode(0o644);
                header.set_mtime(0);
                header.set_uid(0);
                header.set_gid(0);
                builder
                    .append_data(&mut header, path, *content)
                    .map_err(|e| SecureTransError::archive(path, e))?;
            }
        }
    }

    let encoder = builder
        .into_inner()
        .map_err(|e| SecureTransError::archive("<archive>", e))?;
    let bytes = encoder
        .finish()
        .map_err(|e| SecureTransError::archive("<archive>", e))?;

    debug!(nodes = nodes.len(), bytes = bytes.len(), "archive built");
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    fn entry<'a>(relative_path: &'a str, name: &'a str, content: &'a [u8]) -> ArchiveEntry<'a> {
        ArchiveEntry {
            relative_path,
            name,
            content,
        }
    }

    /// 读取归档，返回 (路径, 是否目录, 内容)
    fn read_back(bytes: &[u8]) -> Vec<(String, bool, Vec<u8>)> {
        let mut archive = tar::Archive::new(GzDecoder::new(bytes));
        let mut out = Vec::new();
        for file in archive.entries().unwrap() {
            let mut file = file.unwrap();
            let path = file
                .path()
                .unwrap()
                .to_string_lossy()
                .trim_end_matches('/')
                .to_string();
            let is_dir = file.header().entry_type().is_dir();
            let mut data = Vec::new();
            file.read_to_end(&mut data).unwrap();
            out.push((path, is_dir, data));
        }
        out
    }

    #[test]
    fn test_folders_created_once() {
        let entries = vec![
            entry("a/b/one.txt", "one.pdf", b"1"),
            entry("a/b/two.txt", "two.pdf", b"2"),
            entry("a/three.txt", "three.pdf", b"3"),
        ];
        let nodes = plan(&entries).unwrap();
        let folders: Vec<_> = nodes
            .iter()
            .filter_map(|n| match n {
                ArchiveNode::Folder(p) => Some(p.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(folders, vec!["a", "a/b"]);

        let read = read_back(&build_archive(&entries).unwrap());
        let dirs: Vec<_> = read.iter().filter(|e| e.1).map(|e| e.0.as_str()).collect();
        assert_eq!(dirs, vec!["a", "a/b"]);
        let files: Vec<_> = read.iter().filter(|e| !e.1).map(|e| e.0.as_str()).collect();
        assert_eq!(files, vec!["a/b/one.pdf", "a/b/two.pdf", "a/three.pdf"]);
    }

    #[test]
    fn test_root_entries_and_final_names() {
        let entries = vec![entry("photo.png", "holiday-001.webp", b"img")];
        let read = read_back(&build_archive(&entries).unwrap());
        assert_eq!(read, vec![("holiday-001.webp".to_string(), false, b"img".to_vec())]);
    }

    #[test]
    fn test_structure_is_deterministic() {
        let entries = vec![
            entry("x/y/z.txt", "z.txt", b"z"),
            entry("w.txt", "w.txt", b"w"),
            entry("x/v.txt", "v.txt", b"v"),
        ];
        let first = read_back(&build_archive(&entries).unwrap());
        let second = read_back(&build_archive(&entries).unwrap());
        assert_eq!(first, second);
    }

    #[test]
    fn test_duplicate_paths_replace_content() {
        let entries = vec![
            entry("d/a.txt", "out.txt", b"first"),
            entry("d/other.txt", "keep.txt", b"keep"),
            entry("d/b.txt", "out.txt", b"second"),
        ];
        let read = read_back(&build_archive(&entries).unwrap());
        let files: Vec<_> = read.into_iter().filter(|e| !e.1).collect();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0], ("d/out.txt".to_string(), false, b"second".to_vec()));
        assert_eq!(files[1].0, "d/keep.txt");
    }

    #[test]
    fn test_invalid_segments_rejected() {
        assert!(matches!(
            plan(&[entry("../escape/a.txt", "a.txt", b"")]),
            Err(SecureTransError::ArchiveError { .. })
        ));
        assert!(plan(&[entry("a.txt", "bad/name.txt", b"")]).is_err());
        assert!(plan(&[entry("a.txt", "", b"")]).is_err());
    }
}
