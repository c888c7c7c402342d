//! # 格式转换模块
//!
//! 根据输入媒体大类与目标格式，一次性选择转换路线并分派到对应后端。
//!
//! ## 路线（按顺序判断）
//! 1. 目标为 `default`: 原样输出
//! 2. 图像 + 可编码的图像格式: 重编码（含尺寸/体积约束）
//! 3. `text/plain` + `pdf`: 文本排版为单页 PDF
//! 4. 音频/视频: 模拟转码，返回占位内容
//! 5. 其他组合: 原样输出
//!
//! 不支持的组合从不报错；只有后端编解码失败才返回 `ConversionError`。
//! 进度至少在开始 (10) 与结束 (100) 时回调。
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 通过 [`Convert`] trait 调用
//! - 子模块: raster, document, media

pub mod document;
pub mod media;
pub mod raster;

use crate::error::{Result, SecureTransError};
use crate::models::{ConversionOptions, MediaCategory, QueuedItem};

use media::{MediaTranscoder, SimulatedTranscoder};
use raster::{ImageBackend, ImageTarget};
use tracing::debug;

/// 转换产物
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Converted {
    pub content: Vec<u8>,
    pub media_type: String,
}

/// 转换接口，编排器只依赖此 trait
pub trait Convert: Send + Sync {
    fn convert(
        &self,
        item: &QueuedItem,
        options: &ConversionOptions,
        on_progress: &mut dyn FnMut(u8),
    ) -> Result<Converted>;
}

/// 转换路线
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Passthrough,
    Image(ImageTarget),
    Document,
    Media(String),
}

/// 为条目选择转换路线
pub fn route(item: &QueuedItem, options: &ConversionOptions) -> Route {
    let Some(target) = options.target() else {
        return Route::Passthrough;
    };

    match item.category() {
        MediaCategory::Image => match ImageTarget::for_format(&target) {
            Some(image_target) => Route::Image(image_target),
            None => Route::Passthrough,
        },
        MediaCategory::Audio | MediaCategory::Video => Route::Media(target),
        _ if item.media_type == "text/plain" && target == "pdf" => Route::Document,
        _ => Route::Passthrough,
    }
}

/// 默认格式转换器
pub struct FormatConverter {
    image: ImageBackend,
    media: Box<dyn MediaTranscoder>,
}

impl Default for FormatConverter {
    fn default() -> Self {
        FormatConverter::new(ImageBackend::default(), Box::new(SimulatedTranscoder::default()))
    }
}

impl FormatConverter {
    pub fn new(image: ImageBackend, media: Box<dyn MediaTranscoder>) -> Self {
        FormatConverter { image, media }
    }
}

impl Convert for FormatConverter {
    fn convert(
        &self,
        item: &QueuedItem,
        options: &ConversionOptions,
        on_progress: &mut dyn FnMut(u8),
    ) -> Result<Converted> {
        on_progress(10);

        let route = route(item, options);
        debug!(name = %item.name, ?route, "conversion route selected");

        let converted = match route {
            Route::Passthrough => passthrough(item),
            Route::Image(target) => {
                let content = self
                    .image
                    .reencode(&item.content, target, on_progress)
                    .map_err(|e| {
                        SecureTransError::conversion(&item.name, &options.target_format, e)
                    })?;
                Converted {
                    content,
                    media_type: target.media_type.to_string(),
                }
            }
            Route::Document => {
                on_progress(30);
                let content = document::text_to_pdf(&item.content).map_err(|e| {
                    SecureTransError::conversion(&item.name, &options.target_format, e)
                })?;
                on_progress(80);
                Converted {
                    content,
                    media_type: document::PDF_MEDIA_TYPE.to_string(),
                }
            }
            Route::Media(target) => self.media.transcode(item, &target, on_progress)?,
        };

        on_progress(100);
        Ok(converted)
    }
}

fn passthrough(item: &QueuedItem) -> Converted {
    Converted {
        content: item.content.clone(),
        media_type: item.media_type.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    struct CountingTranscoder(Arc<AtomicUsize>);

    impl MediaTranscoder for CountingTranscoder {
        fn transcode(
            &self,
            item: &QueuedItem,
            _target: &str,
            _on_progress: &mut dyn FnMut(u8),
        ) -> Result<Converted> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(passthrough(item))
        }
    }

    fn options(target: &str) -> ConversionOptions {
        ConversionOptions {
            target_format: target.to_string(),
            ..Default::default()
        }
    }

    fn counting_converter() -> (FormatConverter, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let converter = FormatConverter::new(
            ImageBackend::default(),
            Box::new(CountingTranscoder(calls.clone())),
        );
        (converter, calls)
    }

    #[test]
    fn test_routes() {
        let photo = QueuedItem::new("1", "a.png", "a.png", vec![]);
        let notes = QueuedItem::new("2", "a.txt", "a.txt", vec![]);
        let song = QueuedItem::new("3", "a.mp3", "a.mp3", vec![]);
        let blob = QueuedItem::new("4", "a.bin", "a.bin", vec![]);

        assert_eq!(route(&photo, &options("default")), Route::Passthrough);
        assert!(matches!(route(&photo, &options("webp")), Route::Image(_)));
        assert_eq!(route(&photo, &options("mp4")), Route::Passthrough);
        assert_eq!(route(&notes, &options("pdf")), Route::Document);
        assert_eq!(route(&notes, &options("txt")), Route::Passthrough);
        assert_eq!(route(&song, &options("ogg")), Route::Media("ogg".to_string()));
        assert_eq!(route(&blob, &options("pdf")), Route::Passthrough);
    }

    #[test]
    fn test_passthrough_is_identity() {
        let (converter, calls) = counting_converter();
        let item = QueuedItem::new("1", "clip.mp4", "clip.mp4", b"not really video".to_vec());
        let mut seen = Vec::new();
        let out = converter
            .convert(&item, &options("default"), &mut |p| seen.push(p))
            .unwrap();
        assert_eq!(out.content, item.content);
        assert_eq!(seen, vec![10, 100]);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_text_to_pdf() {
        let (converter, _) = counting_converter();
        let item = QueuedItem::new("1", "notes.txt", "notes.txt", b"hello".to_vec());
        let mut seen = Vec::new();
        let out = converter
            .convert(&item, &options("pdf"), &mut |p| seen.push(p))
            .unwrap();
        assert!(out.content.starts_with(b"%PDF-"));
        assert_eq!(out.media_type, "application/pdf");
        assert_eq!(seen.first(), Some(&10));
        assert_eq!(seen.last(), Some(&100));
    }

    #[test]
    fn test_codec_failure_is_conversion_error() {
        let (converter, _) = counting_converter();
        let item = QueuedItem::new("1", "broken.jpg", "broken.jpg", b"garbage".to_vec());
        let err = converter.convert(&item, &options("png"), &mut |_| {}).unwrap_err();
        assert!(matches!(err, SecureTransError::ConversionError { .. }));
    }

    #[test]
    fn test_media_goes_to_transcoder() {
        let (converter, calls) = counting_converter();
        let item = QueuedItem::new("1", "song.wav", "song.wav", b"riff".to_vec());
        converter.convert(&item, &options("mp3"), &mut |_| {}).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_simulated_media_progress() {
        let converter = FormatConverter::new(
            ImageBackend::default(),
            Box::new(SimulatedTranscoder::new(Duration::ZERO)),
        );
        let item = QueuedItem::new("1", "song.wav", "song.wav", b"riff".to_vec());
        let mut seen = Vec::new();
        let out = converter
            .convert(&item, &options("ogg"), &mut |p| seen.push(p))
            .unwrap();
        assert_eq!(seen, vec![10, 50, 100]);
        assert_eq!(out.media_type, "audio/ogg");
    }
}
