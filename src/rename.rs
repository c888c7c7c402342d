//! # 重命名模式引擎
//!
//! 将模式字符串解析为文件名。
//!
//! ## 占位符
//! - `{name}`: 原始基础名
//! - `{i}` / `{index}`: 序号，可带零填充宽度，如 `{i:3}`
//! - `{date}`: 当前日期 `YYYY-MM-DD`
//! - `{time}`: 当前时间 `HH-MM-SS`
//!
//! 未知占位符原样保留。替换完成后，文件系统非法字符 `< > : " / \ | ? *`
//! 统一替换为 `_`。
//!
//! ## 依赖关系
//! - 被 `batch/queue.rs`, `commands/rename.rs` 使用
//! - 使用 `regex`, `chrono`

use chrono::{Local, NaiveDateTime};
use regex::{Captures, Regex};
use std::sync::LazyLock;

static INDEX_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(?:i|index)(?::(\d+))?\}").expect("index placeholder regex"));

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[<>:"/\\|?*]"#).expect("unsafe character regex"));

/// 使用当前本地时间解析模式
pub fn resolve(pattern: &str, base_name: &str, index: usize) -> String {
    resolve_at(pattern, base_name, index, Local::now().naive_local())
}

/// 使用指定时间解析模式
pub fn resolve_at(pattern: &str, base_name: &str, index: usize, now: NaiveDateTime) -> String {
    let resolved = pattern.replace("{name}", base_name);

    let resolved = INDEX_PLACEHOLDER.replace_all(&resolved, |caps: &Captures| {
        let width = caps
            .get(1)
            .and_then(|m| m.as_str().parse::<usize>().ok())
            .unwrap_or(1);
        let digits = index.to_string();
        let mut padded = "0".repeat(width.saturating_sub(digits.len()));
        padded.push_str(&digits);
        padded
    });

    let resolved = resolved
        .replace("{date}", &now.format("%Y-%m-%d").to_string())
        .replace("{time}", &now.format("%H-%M-%S").to_string());

    sanitize(&resolved)
}

/// 替换文件系统非法字符
pub fn sanitize(name: &str) -> String {
    UNSAFE_CHARS.replace_all(name, "_").into_owned()
}

/// 检查模式中是否包含序号占位符
pub fn uses_index(pattern: &str) -> bool {
    INDEX_PLACEHOLDER.is_match(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn fixed_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(7, 5, 2)
            .unwrap()
    }

    #[test]
    fn test_padded_index() {
        assert_eq!(resolve("{i:3}", "photo", 7), "007");
        assert_eq!(resolve("img-{i:3}-x", "photo", 7), "img-007-x");
        assert_eq!(resolve("{index:2}", "photo", 123), "123");
        assert_eq!(resolve("{i}", "photo", 12), "12");
        assert_eq!(resolve("{i:0}", "photo", 4), "4");
    }

    #[test]
    fn test_very_wide_index() {
        let resolved = resolve("{i:70000}", "x", 7);
        assert_eq!(resolved.len(), 70_000);
        assert!(resolved.starts_with("000"));
        assert!(resolved.ends_with("07"));
    }

    #[test]
    fn test_name_placeholder() {
        assert_eq!(resolve("{name}", "holiday", 1), "holiday");
        assert_eq!(resolve("{name}_{name}", "a", 1), "a_a");
    }

    #[test]
    fn test_independent_of_index_without_index_placeholder() {
        let now = fixed_time();
        for pattern in ["{name}-copy", "{date}_{time}", "plain", "{unknown}"] {
            assert!(!uses_index(pattern));
            assert_eq!(
                resolve_at(pattern, "base", 1, now),
                resolve_at(pattern, "base", 99, now)
            );
        }
    }

    #[test]
    fn test_date_and_time() {
        let now = fixed_time();
        assert_eq!(resolve_at("{date}", "x", 1, now), "2024-03-09");
        assert_eq!(resolve_at("{time}", "x", 1, now), "07-05-02");
        assert_eq!(
            resolve_at("{name}-{date}-{i:2}.jpg", "cat", 3, now),
            "cat-2024-03-09-03.jpg"
        );
    }

    #[test]
    fn test_unknown_placeholders_kept() {
        assert_eq!(resolve("{foo}-{i}", "x", 2), "{foo}-2");
    }

    #[test]
    fn test_sanitization() {
        assert_eq!(resolve(r#"a<b>c:d"e/f\g|h?i*j"#, "x", 1), "a_b_c_d_e_f_g_h_i_j");
        assert_eq!(resolve("{name}", "we/ird", 1), "we_ird");
        assert_eq!(sanitize("clean-name.txt"), "clean-name.txt");
    }
}
