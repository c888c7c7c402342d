//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `process`: 转换、重命名、加密并归档
//! - `rename`: 预览批量重命名结果
//! - `decrypt`: 解密 `.enc` 文件
//! - `formats`: 列出支持的目标格式
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: process, rename, decrypt

pub mod decrypt;
pub mod process;
pub mod rename;

use clap::{ArgAction, Parser, Subcommand};

/// SecureTrans - 批量文件转换、重命名与加密工具
#[derive(Parser)]
#[command(name = "securetrans")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Batch convert, rename, encrypt and archive files", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase diagnostic verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Convert, rename and optionally encrypt files, then archive the results
    Process(process::ProcessArgs),

    /// Preview batch-rename results without writing anything
    Rename(rename::RenameArgs),

    /// Decrypt files produced with --encrypt
    Decrypt(decrypt::DecryptArgs),

    /// List supported target formats per media category
    Formats,
}
