//! # 批量处理模块
//!
//! 提供队列管理与串行批处理流水线。
//!
//! ## 功能
//! - 收集输入文件为队列条目
//! - 队列选择、重命名与事件应用
//! - 串行转换、加密、结果收集与合并归档
//! - 事件通道发布状态与进度
//!
//! ## 依赖关系
//! - 被各命令模块使用
//! - 使用 `walkdir`/`glob`/`rayon` 收集文件
//! - 使用 `convert/`, `crypto.rs`, `archive.rs` 执行处理

pub mod collector;
pub mod events;
pub mod queue;
pub mod runner;
pub mod session;

pub use collector::FileCollector;
pub use events::{BatchEvent, LogEntry};
pub use queue::BatchQueue;
pub use runner::{output_name, BatchProcessor};
pub use session::BatchSession;
