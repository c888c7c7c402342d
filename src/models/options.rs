//! # 批处理选项
//!
//! 一次运行中对所有选中条目统一生效的配置。
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs`, `convert/` 使用
//! - 由 `commands/process.rs` 根据 CLI 参数构造

/// 表示“不转换”的目标格式标识
pub const PASSTHROUGH_FORMAT: &str = "default";

/// 加密子配置
#[derive(Debug, Clone, Default)]
pub struct EncryptionOptions {
    pub enabled: bool,
    pub passphrase: String,
}

/// 转换选项
#[derive(Debug, Clone)]
pub struct ConversionOptions {
    /// 目标格式，`default` 表示原样输出
    pub target_format: String,

    /// 文件名前缀
    pub prefix: String,

    /// 文件名后缀
    pub suffix: String,

    pub encryption: EncryptionOptions,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        ConversionOptions {
            target_format: PASSTHROUGH_FORMAT.to_string(),
            prefix: String::new(),
            suffix: String::new(),
            encryption: EncryptionOptions::default(),
        }
    }
}

impl ConversionOptions {
    /// 是否请求了格式转换
    pub fn wants_conversion(&self) -> bool {
        self.target().is_some()
    }

    /// 请求的目标格式（小写），`default` 时为 `None`
    pub fn target(&self) -> Option<String> {
        let target = self.target_format.trim().to_lowercase();
        if target.is_empty() || target == PASSTHROUGH_FORMAT {
            None
        } else {
            Some(target)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_normalization() {
        let mut options = ConversionOptions::default();
        assert_eq!(options.target(), None);
        assert!(!options.wants_conversion());

        options.target_format = " WebP ".to_string();
        assert_eq!(options.target().as_deref(), Some("webp"));
        assert!(options.wants_conversion());

        options.target_format = "Default".to_string();
        assert_eq!(options.target(), None);
    }
}
