//! # SecureTrans - 批量文件转换、重命名与加密工具
//!
//! 把一批文件按统一流水线处理：格式转换 → 模式重命名 →（可选）加密，
//! 然后写出单个结果并生成保留目录结构的合并归档。
//!
//! ## 子命令
//! - `process` - 运行完整流水线
//! - `rename`  - 预览批量重命名
//! - `decrypt` - 解密 `.enc` 文件
//! - `formats` - 列出支持的目标格式
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── batch/     (队列、编排器、会话)
//!   │     ├── convert/   (图像/文档/媒体转换)
//!   │     ├── crypto.rs  (AES-GCM 加密)
//!   │     ├── archive.rs (tar.gz 合并归档)
//!   │     ├── rename.rs  (重命名模式引擎)
//!   │     └── models/    (数据模型)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod archive;
mod batch;
mod cli;
mod commands;
mod convert;
mod crypto;
mod error;
mod models;
mod rename;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();
    utils::logging::init(cli.verbose);

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
