//! # rename 命令实现
//!
//! 对选中文件应用批量重命名模式并预览最终文件名，不写出任何文件。
//!
//! ## 依赖关系
//! - 使用 `cli/rename.rs` 定义的参数
//! - 复用 `commands/process.rs` 的输入收集与选项构造

use super::process::{build_options, load_items, prepare_queue};
use crate::batch::{output_name, BatchQueue};
use crate::cli::rename::RenameArgs;
use crate::error::Result;
use crate::models::ConversionOptions;
use crate::utils::output;

use tabled::{Table, Tabled};

/// 预览表格行
#[derive(Debug, Clone, Tabled)]
struct PreviewRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Original")]
    original: String,
    #[tabled(rename = "Renamed")]
    renamed: String,
    #[tabled(rename = "Final name")]
    final_name: String,
}

/// 执行 rename 预览
pub fn execute(args: RenameArgs) -> Result<()> {
    output::print_header("Rename preview");

    let options = build_options(&args.naming)?;
    let mut queue = BatchQueue::new(load_items(&args.input)?);
    prepare_queue(&mut queue, &args.input, &args.naming)?;

    println!("{}", Table::new(preview_rows(&queue, &options)));
    output::print_done(&format!(
        "{} of {} file(s) would be renamed; nothing was written",
        queue.selected_count(),
        queue.len()
    ));
    Ok(())
}

/// 构造预览行，未选中条目标记为 `(excluded)`
fn preview_rows(queue: &BatchQueue, options: &ConversionOptions) -> Vec<PreviewRow> {
    queue
        .items()
        .iter()
        .enumerate()
        .map(|(i, item)| PreviewRow {
            index: i + 1,
            original: item.original_path.clone(),
            renamed: item.display_name(),
            final_name: if item.selected {
                output_name(item, options)
            } else {
                "(excluded)".to_string()
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QueuedItem;
    use chrono::NaiveDate;

    #[test]
    fn test_preview_marks_excluded_and_encrypted() {
        let mut queue = BatchQueue::new(vec![
            QueuedItem::new("1", "a.jpg", "trip/a.jpg", vec![]),
            QueuedItem::new("2", "b.jpg", "trip/b.jpg", vec![]),
            QueuedItem::new("3", "c.jpg", "c.jpg", vec![]),
        ]);
        queue.toggle_selected("2");
        let now = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        queue.batch_rename_at("photo-{i}", now);

        let mut options = ConversionOptions::default();
        options.encryption.enabled = true;

        let rows = preview_rows(&queue, &options);
        let finals: Vec<&str> = rows.iter().map(|row| row.final_name.as_str()).collect();
        assert_eq!(finals, vec!["photo-1.jpg.enc", "(excluded)", "photo-2.jpg.enc"]);

        assert_eq!(rows[0].renamed, "photo-1");
        assert_eq!(rows[0].original, "trip/a.jpg");
        assert_eq!(rows[1].renamed, "b.jpg");
        assert_eq!(rows[2].index, 3);
    }
}
