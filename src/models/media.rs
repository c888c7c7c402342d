//! # 媒体类型模型
//!
//! 根据扩展名推断媒体类型 (MIME)，并按大类归档，决定转换器走哪个后端。
//!
//! ## 依赖关系
//! - 被 `models/item.rs`, `convert/`, `commands/formats.rs` 使用
//! - 无外部模块依赖

use serde::Serialize;

/// 媒体大类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MediaCategory {
    Image,
    Audio,
    Video,
    Document,
    General,
}

impl MediaCategory {
    /// 从 MIME 类型推断大类
    pub fn from_media_type(media_type: &str) -> Self {
        let major = media_type.split('/').next().unwrap_or_default();
        match major {
            "image" => MediaCategory::Image,
            "audio" => MediaCategory::Audio,
            "video" => MediaCategory::Video,
            "text" => MediaCategory::Document,
            _ => match media_type {
                "application/pdf"
                | "application/msword"
                | "application/rtf"
                | "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                    MediaCategory::Document
                }
                _ => MediaCategory::General,
            },
        }
    }

    /// MIME 主类型字符串
    pub fn major_type(&self) -> &'static str {
        match self {
            MediaCategory::Image => "image",
            MediaCategory::Audio => "audio",
            MediaCategory::Video => "video",
            MediaCategory::Document => "document",
            MediaCategory::General => "general",
        }
    }

    /// 全部大类（按显示顺序）
    pub fn all() -> &'static [MediaCategory] {
        &[
            MediaCategory::Image,
            MediaCategory::Video,
            MediaCategory::Audio,
            MediaCategory::Document,
            MediaCategory::General,
        ]
    }

    /// 该大类可选的目标格式 (值, 标签)
    pub fn supported_formats(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            MediaCategory::Image => &[("jpg", "JPG"), ("png", "PNG"), ("webp", "WebP"), ("gif", "GIF")],
            MediaCategory::Video => &[("mp4", "MP4"), ("webm", "WebM"), ("gif", "Animated GIF")],
            MediaCategory::Audio => &[("mp3", "MP3"), ("wav", "WAV"), ("ogg", "OGG")],
            MediaCategory::Document => &[("pdf", "PDF"), ("txt", "Text")],
            MediaCategory::General => &[],
        }
    }
}

impl std::fmt::Display for MediaCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.major_type())
    }
}

/// 未知类型的默认 MIME
pub const OCTET_STREAM: &str = "application/octet-stream";

/// 从文件名扩展名推断 MIME 类型
pub fn media_type_for_name(name: &str) -> &'static str {
    let ext = match name.rfind('.') {
        Some(pos) if pos > 0 => name[pos + 1..].to_lowercase(),
        _ => return OCTET_STREAM,
    };

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "svg" => "image/svg+xml",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" | "oga" => "audio/ogg",
        "flac" => "audio/flac",
        "m4a" => "audio/mp4",
        "aac" => "audio/aac",
        "mp4" | "m4v" => "video/mp4",
        "webm" => "video/webm",
        "mkv" => "video/x-matroska",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",
        "txt" | "log" => "text/plain",
        "md" => "text/markdown",
        "csv" => "text/csv",
        "html" | "htm" => "text/html",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "json" => "application/json",
        "zip" => "application/zip",
        _ => OCTET_STREAM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_for_name() {
        assert_eq!(media_type_for_name("photo.JPG"), "image/jpeg");
        assert_eq!(media_type_for_name("notes.txt"), "text/plain");
        assert_eq!(media_type_for_name("clip.mkv"), "video/x-matroska");
        assert_eq!(media_type_for_name("README"), OCTET_STREAM);
        assert_eq!(media_type_for_name(".env"), OCTET_STREAM);
    }

    #[test]
    fn test_category_from_media_type() {
        assert_eq!(MediaCategory::from_media_type("image/png"), MediaCategory::Image);
        assert_eq!(MediaCategory::from_media_type("audio/mpeg"), MediaCategory::Audio);
        assert_eq!(MediaCategory::from_media_type("video/mp4"), MediaCategory::Video);
        assert_eq!(MediaCategory::from_media_type("text/plain"), MediaCategory::Document);
        assert_eq!(MediaCategory::from_media_type("application/pdf"), MediaCategory::Document);
        assert_eq!(MediaCategory::from_media_type(OCTET_STREAM), MediaCategory::General);
    }
}
