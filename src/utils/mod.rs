//! # 工具函数模块
//!
//! 提供美化输出、进度条、诊断日志初始化与输出文件写入等工具。
//!
//! ## 依赖关系
//! - 被 `main.rs` 与 `commands/` 模块使用
//! - 子模块: files, logging, output, progress

pub mod files;
pub mod logging;
pub mod output;
pub mod progress;
