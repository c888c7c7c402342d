//! # 队列条目数据模型
//!
//! 定义等待处理的文件条目及其状态机。
//!
//! ## 状态
//! `Queued -> Converting -> [Encrypting] -> Done`，任何处理中状态都可能转为 `Error`。
//! 状态单调前进，只有整批重置才能回到 `Queued`。
//!
//! ## 依赖关系
//! - 被 `batch/`, `convert/`, `rename.rs` 使用
//! - 使用 `models/media.rs`

use super::media::{media_type_for_name, MediaCategory};
use serde::Serialize;

/// 条目状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ItemStatus {
    Queued,
    Converting,
    Encrypting,
    Done,
    Error,
}

impl ItemStatus {
    fn rank(self) -> u8 {
        match self {
            ItemStatus::Queued => 0,
            ItemStatus::Converting => 1,
            ItemStatus::Encrypting => 2,
            ItemStatus::Done | ItemStatus::Error => 3,
        }
    }

    /// 是否允许从当前状态转换到 `next`
    pub fn can_advance_to(self, next: ItemStatus) -> bool {
        next.rank() > self.rank()
    }

    /// 是否处于处理中（进度有意义）
    pub fn is_active(self) -> bool {
        matches!(self, ItemStatus::Converting | ItemStatus::Encrypting)
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemStatus::Queued => write!(f, "queued"),
            ItemStatus::Converting => write!(f, "converting"),
            ItemStatus::Encrypting => write!(f, "encrypting"),
            ItemStatus::Done => write!(f, "done"),
            ItemStatus::Error => write!(f, "error"),
        }
    }
}

/// 按最后一个 `.` 拆分文件名
///
/// 点号位于开头（如 `.env`）时不视为扩展名。
pub fn split_name(full: &str) -> (&str, Option<&str>) {
    match full.rfind('.') {
        Some(pos) if pos > 0 => (&full[..pos], Some(&full[pos + 1..])),
        _ => (full, None),
    }
}

/// 等待处理的文件条目
#[derive(Debug, Clone)]
pub struct QueuedItem {
    /// 批次内唯一标识
    pub id: String,

    /// 原始文件名
    pub name: String,

    /// 声明的 MIME 类型
    pub media_type: String,

    /// 原始内容
    pub content: Vec<u8>,

    /// 来源提供的相对路径（文件夹上传时包含目录段）
    pub original_path: String,

    pub status: ItemStatus,

    /// 0-100，仅在处理中有意义
    pub progress: u8,

    /// 自定义基础名
    pub custom_name: Option<String>,

    /// 自定义扩展名
    pub custom_extension: Option<String>,

    pub selected: bool,

    /// 仅在 `Error` 状态下存在
    pub error_message: Option<String>,
}

impl QueuedItem {
    /// 创建新条目，MIME 类型由文件名推断
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        original_path: impl Into<String>,
        content: Vec<u8>,
    ) -> Self {
        let name = name.into();
        let media_type = media_type_for_name(&name).to_string();
        QueuedItem {
            id: id.into(),
            name,
            media_type,
            content,
            original_path: original_path.into(),
            status: ItemStatus::Queued,
            progress: 0,
            custom_name: None,
            custom_extension: None,
            selected: true,
            error_message: None,
        }
    }

    /// 声明大小（字节）
    pub fn size(&self) -> usize {
        self.content.len()
    }

    pub fn category(&self) -> MediaCategory {
        MediaCategory::from_media_type(&self.media_type)
    }

    /// 原始基础名（去掉最后一个扩展段）
    pub fn base_name(&self) -> &str {
        split_name(&self.name).0
    }

    /// 原始扩展名
    pub fn original_extension(&self) -> Option<&str> {
        split_name(&self.name).1
    }

    /// 当前显示名（自定义名优先）
    pub fn display_name(&self) -> String {
        match (&self.custom_name, &self.custom_extension) {
            (Some(name), Some(ext)) => format!("{}.{}", name, ext),
            (Some(name), None) => name.clone(),
            _ => self.name.clone(),
        }
    }

    /// 由完整文件名设置覆盖名
    pub fn set_override(&mut self, full: &str) {
        let (base, ext) = split_name(full);
        self.custom_name = Some(base.to_string());
        self.custom_extension = ext.map(str::to_string);
    }

    /// 清除覆盖名
    pub fn clear_override(&mut self) {
        self.custom_name = None;
        self.custom_extension = None;
    }

    /// 重置为排队状态
    pub fn reset(&mut self) {
        self.status = ItemStatus::Queued;
        self.progress = 0;
        self.error_message = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_name() {
        assert_eq!(split_name("photo.jpg"), ("photo", Some("jpg")));
        assert_eq!(split_name("archive.tar.gz"), ("archive.tar", Some("gz")));
        assert_eq!(split_name("README"), ("README", None));
        assert_eq!(split_name(".env"), (".env", None));
        assert_eq!(split_name("trailing."), ("trailing", Some("")));
    }

    #[test]
    fn test_base_name_and_extension() {
        let item = QueuedItem::new("a", "holiday.png", "holiday.png", vec![]);
        assert_eq!(item.base_name(), "holiday");
        assert_eq!(item.original_extension(), Some("png"));
        assert_eq!(item.category(), MediaCategory::Image);

        let bare = QueuedItem::new("b", "Makefile", "Makefile", vec![]);
        assert_eq!(bare.base_name(), "Makefile");
        assert_eq!(bare.original_extension(), None);
    }

    #[test]
    fn test_override_and_display_name() {
        let mut item = QueuedItem::new("a", "holiday.png", "holiday.png", vec![]);
        assert_eq!(item.display_name(), "holiday.png");

        item.set_override("beach.webp");
        assert_eq!(item.custom_name.as_deref(), Some("beach"));
        assert_eq!(item.custom_extension.as_deref(), Some("webp"));
        assert_eq!(item.display_name(), "beach.webp");

        item.set_override("beach");
        assert_eq!(item.custom_extension, None);
        assert_eq!(item.display_name(), "beach");

        item.clear_override();
        assert_eq!(item.display_name(), "holiday.png");
    }

    #[test]
    fn test_status_is_monotonic() {
        assert!(ItemStatus::Queued.can_advance_to(ItemStatus::Converting));
        assert!(ItemStatus::Converting.can_advance_to(ItemStatus::Encrypting));
        assert!(ItemStatus::Converting.can_advance_to(ItemStatus::Done));
        assert!(ItemStatus::Encrypting.can_advance_to(ItemStatus::Error));
        assert!(!ItemStatus::Encrypting.can_advance_to(ItemStatus::Converting));
        assert!(!ItemStatus::Done.can_advance_to(ItemStatus::Error));
        assert!(!ItemStatus::Error.can_advance_to(ItemStatus::Queued));
    }
}
