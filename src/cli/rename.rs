//! # rename 子命令 CLI 定义
//!
//! 预览批量重命名后的最终文件名，不写出任何文件
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/rename.rs`

use super::process::{InputArgs, NamingArgs};
use clap::Args;

/// rename 子命令参数
#[derive(Args, Debug)]
pub struct RenameArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub naming: NamingArgs,
}
