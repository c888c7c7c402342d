//! # 批处理队列
//!
//! 持有待处理条目，提供增删、选择、重命名操作，并将编排器发布的事件应用到条目上。
//!
//! ## 依赖关系
//! - 被 `batch/session.rs`, `commands/` 使用
//! - 使用 `rename.rs`, `batch/events.rs`

use super::events::BatchEvent;
use crate::models::{ItemStatus, QueuedItem};
use crate::rename;

use chrono::NaiveDateTime;

/// 批处理队列（显示顺序即处理顺序）
#[derive(Debug, Default)]
pub struct BatchQueue {
    items: Vec<QueuedItem>,
}

impl BatchQueue {
    pub fn new(items: Vec<QueuedItem>) -> Self {
        BatchQueue { items }
    }

    /// 替换整个队列
    pub fn load(&mut self, items: Vec<QueuedItem>) {
        self.items = items;
    }

    pub fn items(&self) -> &[QueuedItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&QueuedItem> {
        self.items.iter().find(|item| item.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut QueuedItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    /// 移除条目
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    /// 移除所有选中条目，返回移除数量
    pub fn remove_selected(&mut self) -> usize {
        let before = self.items.len();
        self.items.retain(|item| !item.selected);
        before - self.items.len()
    }

    /// 切换选中状态，返回新状态
    pub fn toggle_selected(&mut self, id: &str) -> Option<bool> {
        let item = self.get_mut(id)?;
        item.selected = !item.selected;
        Some(item.selected)
    }

    pub fn set_selected(&mut self, id: &str, selected: bool) -> bool {
        match self.get_mut(id) {
            Some(item) => {
                item.selected = selected;
                true
            }
            None => false,
        }
    }

    pub fn select_all(&mut self, selected: bool) {
        for item in &mut self.items {
            item.selected = selected;
        }
    }

    pub fn selected(&self) -> Vec<&QueuedItem> {
        self.items.iter().filter(|item| item.selected).collect()
    }

    pub fn selected_count(&self) -> usize {
        self.items.iter().filter(|item| item.selected).count()
    }

    /// 显式重命名
    ///
    /// 空名或与原名相同时清除覆盖名。
    pub fn rename(&mut self, id: &str, full_name: &str) -> bool {
        let Some(item) = self.get_mut(id) else {
            return false;
        };

        let trimmed = full_name.trim();
        if trimmed.is_empty() || trimmed == item.name {
            item.clear_override();
        } else {
            item.set_override(trimmed);
        }
        true
    }

    /// 按模式批量重命名选中条目，返回重命名数量
    pub fn batch_rename(&mut self, pattern: &str) -> usize {
        self.rename_selected(|base, index| rename::resolve(pattern, base, index))
    }

    /// 按模式批量重命名（指定时间）
    pub fn batch_rename_at(&mut self, pattern: &str, now: NaiveDateTime) -> usize {
        self.rename_selected(|base, index| rename::resolve_at(pattern, base, index, now))
    }

    /// 序号从 1 开始，只在选中条目上递增
    fn rename_selected(&mut self, resolve: impl Fn(&str, usize) -> String) -> usize {
        let mut index = 1;
        for item in self.items.iter_mut().filter(|item| item.selected) {
            let resolved = resolve(item.base_name(), index);
            item.set_override(&resolved);
            index += 1;
        }
        index - 1
    }

    /// 应用编排器事件，状态只允许单调前进
    pub fn apply_event(&mut self, event: &BatchEvent) {
        match event {
            BatchEvent::Status { id, status } => {
                if let Some(item) = self.get_mut(id) {
                    if item.status.can_advance_to(*status) {
                        item.status = *status;
                        match status {
                            ItemStatus::Converting => item.progress = 0,
                            ItemStatus::Done => item.progress = 100,
                            _ => {}
                        }
                    }
                }
            }
            BatchEvent::Progress { id, progress } => {
                if let Some(item) = self.get_mut(id) {
                    if item.status.is_active() {
                        item.progress = (*progress).min(100);
                    }
                }
            }
            BatchEvent::Failed { id, message } => {
                if let Some(item) = self.get_mut(id) {
                    if item.status.can_advance_to(ItemStatus::Error) {
                        item.status = ItemStatus::Error;
                        item.error_message = Some(message.clone());
                    }
                }
            }
            _ => {}
        }
    }

    /// 整批重置状态
    pub fn reset(&mut self) {
        for item in &mut self.items {
            item.reset();
        }
    }

    /// 重置选中条目的状态，未选中条目保持不变
    pub fn reset_selected(&mut self) {
        for item in self.items.iter_mut().filter(|item| item.selected) {
            item.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn queue_of(names: &[&str]) -> BatchQueue {
        BatchQueue::new(
            names
                .iter()
                .enumerate()
                .map(|(i, name)| QueuedItem::new(format!("{}", i + 1), *name, *name, vec![]))
                .collect(),
        )
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap()
    }

    #[test]
    fn test_batch_rename_skips_unselected() {
        let mut queue = queue_of(&["a.jpg", "b.jpg", "c.jpg", "d.jpg", "e.jpg"]);
        queue.set_selected("2", false);
        queue.set_selected("4", false);

        assert_eq!(queue.batch_rename_at("{i}", now()), 3);

        let names: Vec<_> = queue
            .items()
            .iter()
            .map(|item| item.custom_name.clone())
            .collect();
        assert_eq!(
            names,
            vec![
                Some("1".to_string()),
                None,
                Some("2".to_string()),
                None,
                Some("3".to_string())
            ]
        );
    }

    #[test]
    fn test_batch_rename_with_extension() {
        let mut queue = queue_of(&["cat.png", "dog.png"]);
        queue.batch_rename_at("{name}-{i:2}.webp", now());
        let first = queue.get("1").unwrap();
        assert_eq!(first.custom_name.as_deref(), Some("cat-01"));
        assert_eq!(first.custom_extension.as_deref(), Some("webp"));

        queue.batch_rename_at("{name}", now());
        let first = queue.get("1").unwrap();
        assert_eq!(first.custom_name.as_deref(), Some("cat"));
        assert_eq!(first.custom_extension, None);
    }

    #[test]
    fn test_explicit_rename() {
        let mut queue = queue_of(&["report.txt"]);
        assert!(queue.rename("1", "  summary.md "));
        let item = queue.get("1").unwrap();
        assert_eq!(item.custom_name.as_deref(), Some("summary"));
        assert_eq!(item.custom_extension.as_deref(), Some("md"));

        queue.rename("1", ".hidden");
        let item = queue.get("1").unwrap();
        assert_eq!(item.custom_name.as_deref(), Some(".hidden"));
        assert_eq!(item.custom_extension, None);

        queue.rename("1", "report.txt");
        assert_eq!(queue.get("1").unwrap().custom_name, None);

        assert!(!queue.rename("missing", "x"));
    }

    #[test]
    fn test_selection_and_removal() {
        let mut queue = queue_of(&["a", "b", "c"]);
        assert_eq!(queue.selected_count(), 3);
        assert_eq!(queue.toggle_selected("2"), Some(false));
        assert_eq!(queue.selected_count(), 2);
        assert_eq!(queue.remove_selected(), 2);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.items()[0].id, "2");

        queue.select_all(true);
        assert!(queue.remove("2"));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_events_are_monotonic() {
        let mut queue = queue_of(&["a.txt"]);
        let status = |status| BatchEvent::Status {
            id: "1".to_string(),
            status,
        };

        queue.apply_event(&BatchEvent::Progress {
            id: "1".to_string(),
            progress: 40,
        });
        assert_eq!(queue.get("1").unwrap().progress, 0);

        queue.apply_event(&status(ItemStatus::Converting));
        queue.apply_event(&BatchEvent::Progress {
            id: "1".to_string(),
            progress: 40,
        });
        assert_eq!(queue.get("1").unwrap().progress, 40);

        queue.apply_event(&status(ItemStatus::Done));
        queue.apply_event(&status(ItemStatus::Converting));
        queue.apply_event(&BatchEvent::Failed {
            id: "1".to_string(),
            message: "late".to_string(),
        });
        let item = queue.get("1").unwrap();
        assert_eq!(item.status, ItemStatus::Done);
        assert_eq!(item.progress, 100);
        assert_eq!(item.error_message, None);

        queue.reset();
        assert_eq!(queue.get("1").unwrap().status, ItemStatus::Queued);
    }

    #[test]
    fn test_failure_event_records_message() {
        let mut queue = queue_of(&["a.txt"]);
        queue.apply_event(&BatchEvent::Status {
            id: "1".to_string(),
            status: ItemStatus::Converting,
        });
        queue.apply_event(&BatchEvent::Failed {
            id: "1".to_string(),
            message: "boom".to_string(),
        });
        let item = queue.get("1").unwrap();
        assert_eq!(item.status, ItemStatus::Error);
        assert_eq!(item.error_message.as_deref(), Some("boom"));
    }

    #[test]
    fn test_reset_selected_leaves_others() {
        let mut queue = queue_of(&["a.txt", "b.txt"]);
        for id in ["1", "2"] {
            queue.apply_event(&BatchEvent::Status {
                id: id.to_string(),
                status: ItemStatus::Converting,
            });
            queue.apply_event(&BatchEvent::Failed {
                id: id.to_string(),
                message: "boom".to_string(),
            });
        }
        queue.toggle_selected("2");
        queue.reset_selected();

        let first = queue.get("1").unwrap();
        assert_eq!(first.status, ItemStatus::Queued);
        assert_eq!(first.error_message, None);
        assert_eq!(queue.get("2").unwrap().status, ItemStatus::Error);
    }
}
