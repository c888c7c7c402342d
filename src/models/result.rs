//! # 处理结果数据模型
//!
//! 单个条目成功处理后的产物。失败的条目不会产生结果。
//!
//! ## 依赖关系
//! - 由 `batch/runner.rs` 创建
//! - 被 `archive.rs`, `commands/process.rs` 使用

use serde::Serialize;

/// 单个条目的处理结果
#[derive(Debug, Clone)]
pub struct ProcessedResult {
    /// 与 `QueuedItem::id` 一致
    pub id: String,

    pub original_name: String,

    /// 计算得到的最终文件名
    pub final_name: String,

    pub content: Vec<u8>,

    /// 输出内容的 MIME 类型
    pub media_type: String,

    /// 原始相对路径，归档时决定目录位置
    pub original_path: String,
}

impl ProcessedResult {
    /// 相对路径中的目录段（不含文件名本身）
    pub fn folder_segments(&self) -> Vec<&str> {
        let mut segments: Vec<&str> = self
            .original_path
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();
        segments.pop();
        segments
    }

    /// 生成清单行
    pub fn manifest_row(&self) -> ManifestRow {
        ManifestRow {
            id: self.id.clone(),
            original_name: self.original_name.clone(),
            final_name: self.final_name.clone(),
            original_path: self.original_path.clone(),
            media_type: self.media_type.clone(),
            size_bytes: self.content.len(),
        }
    }
}

/// 结果清单 CSV 行
#[derive(Debug, Clone, Serialize)]
pub struct ManifestRow {
    pub id: String,
    pub original_name: String,
    pub final_name: String,
    pub original_path: String,
    pub media_type: String,
    pub size_bytes: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_at(path: &str) -> ProcessedResult {
        ProcessedResult {
            id: "x".to_string(),
            original_name: "a.txt".to_string(),
            final_name: "a.pdf".to_string(),
            content: vec![1, 2, 3],
            media_type: "application/pdf".to_string(),
            original_path: path.to_string(),
        }
    }

    #[test]
    fn test_folder_segments() {
        assert_eq!(result_at("a/b/c.txt").folder_segments(), vec!["a", "b"]);
        assert_eq!(result_at("//a//c.txt").folder_segments(), vec!["a"]);
        assert!(result_at("c.txt").folder_segments().is_empty());
    }

    #[test]
    fn test_manifest_row() {
        let row = result_at("docs/a.txt").manifest_row();
        assert_eq!(row.final_name, "a.pdf");
        assert_eq!(row.size_bytes, 3);
    }
}
