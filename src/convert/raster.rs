//! # 栅格图像后端
//!
//! 解码输入图像，按最大边长和最大字节数做有损归一化，再编码为目标格式。
//!
//! ## 尺寸约束
//! - 最大边长超限时等比缩放
//! - 编码结果超过字节上限时：JPEG 先逐级降低质量，随后按 3/4 比例缩小尺寸，
//!   直到满足上限或最长边降到 `MIN_DIMENSION`
//!
//! ## 依赖关系
//! - 被 `convert/mod.rs` 调用
//! - 使用 `image`

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat, ImageResult};
use std::io::Cursor;
use tracing::debug;

/// 默认最大边长 (px)
pub const DEFAULT_MAX_DIMENSION: u32 = 1920;

/// 默认最大输出大小 (bytes)
pub const DEFAULT_MAX_BYTES: usize = 1024 * 1024;

const START_QUALITY: u8 = 90;
const MIN_QUALITY: u8 = 40;
const QUALITY_STEP: u8 = 10;
const MIN_DIMENSION: u32 = 64;

/// 图像编码目标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageTarget {
    pub format: ImageFormat,
    pub media_type: &'static str,
}

impl ImageTarget {
    /// 根据目标格式名查找可编码的图像格式
    pub fn for_format(target: &str) -> Option<Self> {
        let (format, media_type) = match target {
            "jpg" | "jpeg" => (ImageFormat::Jpeg, "image/jpeg"),
            "png" => (ImageFormat::Png, "image/png"),
            "webp" => (ImageFormat::WebP, "image/webp"),
            "gif" => (ImageFormat::Gif, "image/gif"),
            "bmp" => (ImageFormat::Bmp, "image/bmp"),
            "tif" | "tiff" => (ImageFormat::Tiff, "image/tiff"),
            _ => return None,
        };
        Some(ImageTarget { format, media_type })
    }
}

/// 图像重编码后端
#[derive(Debug, Clone)]
pub struct ImageBackend {
    max_dimension: u32,
    max_bytes: usize,
}

impl Default for ImageBackend {
    fn default() -> Self {
        ImageBackend::new(DEFAULT_MAX_DIMENSION, DEFAULT_MAX_BYTES)
    }
}

impl ImageBackend {
    pub fn new(max_dimension: u32, max_bytes: usize) -> Self {
        ImageBackend {
            max_dimension: max_dimension.max(1),
            max_bytes: max_bytes.max(1),
        }
    }

    /// 解码、约束尺寸并重编码
    pub fn reencode(
        &self,
        content: &[u8],
        target: ImageTarget,
        on_progress: &mut dyn FnMut(u8),
    ) -> ImageResult<Vec<u8>> {
        let decoded = image::load_from_memory(content)?;
        on_progress(30);

        let (width, height) = decoded.dimensions();
        let mut current = if width > self.max_dimension || height > self.max_dimension {
            debug!(width, height, max = self.max_dimension, "downscaling image");
            decoded.resize(self.max_dimension, self.max_dimension, FilterType::Lanczos3)
        } else {
            decoded
        };
        on_progress(60);

        let mut quality = START_QUALITY;
        loop {
            let encoded = encode(&current, target.format, quality)?;
            if encoded.len() <= self.max_bytes {
                return Ok(encoded);
            }

            if target.format == ImageFormat::Jpeg && quality > MIN_QUALITY {
                quality = quality.saturating_sub(QUALITY_STEP).max(MIN_QUALITY);
                debug!(quality, bytes = encoded.len(), "lowering jpeg quality");
                continue;
            }

            let (w, h) = current.dimensions();
            if w.max(h) <= MIN_DIMENSION {
                debug!(bytes = encoded.len(), "size bound not reached, keeping smallest encoding");
                return Ok(encoded);
            }
            let next_w = (w * 3 / 4).max(1);
            let next_h = (h * 3 / 4).max(1);
            debug!(next_w, next_h, bytes = encoded.len(), "shrinking image to meet size bound");
            current = current.resize_exact(next_w, next_h, FilterType::Triangle);
        }
    }
}

fn encode(img: &DynamicImage, format: ImageFormat, quality: u8) -> ImageResult<Vec<u8>> {
    let mut buf = Vec::new();
    match format {
        ImageFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
            rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut buf, quality))?;
        }
        _ => {
            let rgba = DynamicImage::ImageRgba8(img.to_rgba8());
            rgba.write_to(&mut Cursor::new(&mut buf), format)?;
        }
    }
    Ok(buf)
}
