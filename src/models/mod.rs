//! # 数据模型模块
//!
//! 定义队列条目、转换选项、处理结果与媒体类型模型。
//!
//! ## 依赖关系
//! - 被 `batch/`, `convert/`, `commands/` 使用
//! - 子模块: item, media, options, result

pub mod item;
pub mod media;
pub mod options;
pub mod result;

pub use item::{ItemStatus, QueuedItem};
pub use media::MediaCategory;
pub use options::{ConversionOptions, EncryptionOptions, PASSTHROUGH_FORMAT};
pub use result::ProcessedResult;
