//! # 音视频后端
//!
//! 当前不做真实转码：[`SimulatedTranscoder`] 模拟耗时并返回带目标类型标记的占位内容。
//! 真实的转码器实现 [`MediaTranscoder`] 后即可替换，编排器无需改动。
//!
//! ## 依赖关系
//! - 被 `convert/mod.rs` 调用

use super::Converted;
use crate::error::Result;
use crate::models::QueuedItem;

use std::thread;
use std::time::Duration;
use tracing::debug;

/// 模拟转码默认耗时（两段各占一半）
pub const DEFAULT_SIMULATED_DELAY: Duration = Duration::from_millis(4000);

/// 音视频转码接口
pub trait MediaTranscoder: Send + Sync {
    fn transcode(
        &self,
        item: &QueuedItem,
        target: &str,
        on_progress: &mut dyn FnMut(u8),
    ) -> Result<Converted>;
}

/// 模拟转码器
#[derive(Debug, Clone)]
pub struct SimulatedTranscoder {
    delay: Duration,
}

impl Default for SimulatedTranscoder {
    fn default() -> Self {
        SimulatedTranscoder::new(DEFAULT_SIMULATED_DELAY)
    }
}

impl SimulatedTranscoder {
    pub fn new(delay: Duration) -> Self {
        SimulatedTranscoder { delay }
    }
}

impl MediaTranscoder for SimulatedTranscoder {
    fn transcode(
        &self,
        item: &QueuedItem,
        target: &str,
        on_progress: &mut dyn FnMut(u8),
    ) -> Result<Converted> {
        debug!(name = %item.name, target, "simulating media transcode");
        let half = self.delay / 2;

        thread::sleep(half);
        on_progress(50);
        thread::sleep(half);

        let placeholder = format!("This is a mock converted file: {} to {}", item.name, target);
        Ok(Converted {
            content: placeholder.into_bytes(),
            media_type: format!("{}/{}", item.category().major_type(), target),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_payload() {
        let item = QueuedItem::new("v", "clip.mov", "clip.mov", b"raw".to_vec());
        let mut seen = Vec::new();
        let out = SimulatedTranscoder::new(Duration::ZERO)
            .transcode(&item, "mp4", &mut |p| seen.push(p))
            .unwrap();
        assert_eq!(
            out.content,
            b"This is a mock converted file: clip.mov to mp4".to_vec()
        );
        assert_eq!(out.media_type, "video/mp4");
        assert_eq!(seen, vec![50]);
    }
}
