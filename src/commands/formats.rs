//! # formats 命令实现
//!
//! 以表格列出每个媒体大类可选的目标格式。

use crate::error::Result;
use crate::models::{MediaCategory, PASSTHROUGH_FORMAT};
use crate::utils::output;

use tabled::{Table, Tabled};

#[derive(Debug, Clone, Tabled)]
struct FormatRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Format")]
    format: &'static str,
    #[tabled(rename = "Label")]
    label: &'static str,
}

fn format_rows() -> Vec<FormatRow> {
    MediaCategory::all()
        .iter()
        .flat_map(|category| {
            category
                .supported_formats()
                .iter()
                .map(move |&(format, label)| FormatRow {
                    category: category.to_string(),
                    format,
                    label,
                })
        })
        .collect()
}

/// 执行 formats 命令
pub fn execute() -> Result<()> {
    output::print_header("Supported target formats");
    println!("{}", Table::new(format_rows()));
    output::print_info(&format!(
        "Use '{}' to keep every file in its original format",
        PASSTHROUGH_FORMAT
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_cover_categories() {
        let rows = format_rows();
        let of = |category: &str| -> Vec<&str> {
            rows.iter()
                .filter(|r| r.category == category)
                .map(|r| r.format)
                .collect()
        };
        assert_eq!(of("image"), vec!["jpg", "png", "webp", "gif"]);
        assert_eq!(of("video"), vec!["mp4", "webm", "gif"]);
        assert_eq!(of("audio"), vec!["mp3", "wav", "ogg"]);
        assert_eq!(of("document"), vec!["pdf", "txt"]);
        assert!(of("general").is_empty());
    }
}
