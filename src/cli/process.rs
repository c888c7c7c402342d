//! # process 子命令 CLI 定义
//!
//! 收集文件 → 转换 → 重命名 →（可选）加密 → 写出结果与合并归档
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/process.rs`
//! - `InputArgs` 与 `NamingArgs` 也被 `rename` 子命令复用

use crate::convert::raster::DEFAULT_MAX_DIMENSION;
use crate::models::PASSTHROUGH_FORMAT;
use clap::Args;
use std::path::PathBuf;

/// 输入文件选择参数
#[derive(Args, Debug)]
pub struct InputArgs {
    /// Files or folders to process
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Glob pattern(s) for files to include, comma separated
    #[arg(long, default_value = "*")]
    pub include: String,

    /// Glob pattern(s) for files to deselect, comma separated
    #[arg(long)]
    pub exclude: Option<String>,

    /// Do not recurse into subfolders
    #[arg(long, default_value_t = false)]
    pub shallow: bool,
}

/// 命名与转换参数
#[derive(Args, Debug)]
pub struct NamingArgs {
    /// Batch-rename pattern ({name}, {i}, {i:3}, {date}, {time})
    #[arg(long)]
    pub pattern: Option<String>,

    /// Target format ("default" keeps the original format)
    #[arg(short, long, default_value = PASSTHROUGH_FORMAT)]
    pub format: String,

    /// Text prepended to every output base name
    #[arg(long, default_value = "")]
    pub prefix: String,

    /// Text appended to every output base name
    #[arg(long, default_value = "")]
    pub suffix: String,

    /// Encrypt every output (adds the .enc suffix)
    #[arg(long, default_value_t = false)]
    pub encrypt: bool,
}

/// process 子命令参数
#[derive(Args, Debug)]
pub struct ProcessArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub naming: NamingArgs,

    /// Passphrase used with --encrypt
    #[arg(long, env = "SECURETRANS_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Output directory for processed files
    #[arg(short, long, default_value = "converted")]
    pub output: PathBuf,

    /// Overwrite existing output files
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,

    /// File name (without extension) of the combined archive
    #[arg(long, default_value = "SecureTrans_Archive")]
    pub archive_name: String,

    /// Do not write the combined archive
    #[arg(long, default_value_t = false)]
    pub no_archive: bool,

    /// Write a CSV manifest of all results
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Longest edge of re-encoded images, in pixels
    #[arg(long, default_value_t = DEFAULT_MAX_DIMENSION)]
    pub max_dimension: u32,

    /// Size bound of re-encoded images, in KiB
    #[arg(long, default_value_t = 1024)]
    pub max_size_kb: usize,

    /// Duration of each simulated audio/video transcode, in milliseconds
    #[arg(long, default_value_t = 4000)]
    pub simulate_ms: u64,
}
