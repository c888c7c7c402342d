//! # 批处理事件
//!
//! 编排器不直接修改队列条目，而是通过通道发布不可变事件；
//! 队列持有者（`BatchQueue`）据此更新状态与进度。
//!
//! ## 依赖关系
//! - 由 `batch/runner.rs` 发送
//! - 被 `batch/queue.rs`, `batch/session.rs`, `commands/process.rs` 消费

use crate::models::ItemStatus;

use chrono::{DateTime, Local};
use std::sync::mpsc::Sender;

/// 带时间戳的运行日志
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub message: String,
}

impl LogEntry {
    pub fn now(message: impl Into<String>) -> Self {
        LogEntry {
            timestamp: Local::now(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.timestamp.format("%H:%M:%S"), self.message)
    }
}

/// 批处理事件
#[derive(Debug, Clone)]
pub enum BatchEvent {
    /// 运行开始
    RunStarted { total: usize },
    Log(LogEntry),
    /// 条目状态变化
    Status { id: String, status: ItemStatus },
    /// 条目进度 (0-100)
    Progress { id: String, progress: u8 },
    /// 条目失败
    Failed { id: String, message: String },
    /// 合并归档已生成
    ArchiveReady { bytes: usize },
    /// 运行结束
    RunFinished { succeeded: usize, failed: usize },
}

impl BatchEvent {
    /// 事件关联的条目 ID
    pub fn item_id(&self) -> Option<&str> {
        match self {
            BatchEvent::Status { id, .. }
            | BatchEvent::Progress { id, .. }
            | BatchEvent::Failed { id, .. } => Some(id),
            _ => None,
        }
    }
}

/// 发送事件；接收端已关闭时静默丢弃
pub fn emit(events: &Sender<BatchEvent>, event: BatchEvent) {
    let _ = events.send(event);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_log_entry_format() {
        let entry = LogEntry {
            timestamp: Local.with_ymd_and_hms(2024, 5, 1, 9, 8, 7).unwrap(),
            message: "All files processed.".to_string(),
        };
        assert_eq!(entry.to_string(), "09:08:07: All files processed.");
    }

    #[test]
    fn test_item_id() {
        let event = BatchEvent::Progress {
            id: "a".to_string(),
            progress: 10,
        };
        assert_eq!(event.item_id(), Some("a"));
        assert_eq!(BatchEvent::RunStarted { total: 1 }.item_id(), None);
    }
}
