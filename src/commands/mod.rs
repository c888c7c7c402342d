//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `batch/`, `convert/`, `crypto.rs`, `utils/`
//! - 子模块: process, rename, decrypt, formats

pub mod decrypt;
pub mod formats;
pub mod process;
pub mod rename;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Process(args) => process::execute(args),
        Commands::Rename(args) => rename::execute(args),
        Commands::Decrypt(args) => decrypt::execute(args),
        Commands::Formats => formats::execute(),
    }
}
