//! # decrypt 子命令 CLI 定义
//!
//! 解密 `process --encrypt` 生成的 `.enc` 文件
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/decrypt.rs`

use clap::Args;
use std::path::PathBuf;

/// decrypt 子命令参数
#[derive(Args, Debug)]
pub struct DecryptArgs {
    /// Encrypted files or folders containing them
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Passphrase used at encryption time
    #[arg(long, env = "SECURETRANS_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Output directory for decrypted files
    #[arg(short, long, default_value = "decrypted")]
    pub output: PathBuf,

    /// Overwrite existing output files
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,
}
