//! # 批处理会话
//!
//! 把队列与执行器组合在一起：加载新文件集时清空上一次运行；
//! 启动运行时在单个工作线程上执行编排器，调用线程消费事件并更新队列。
//!
//! ## 依赖关系
//! - 被 `commands/process.rs` 使用
//! - 使用 `batch/queue.rs`, `batch/runner.rs`, `batch/events.rs`

use super::events::BatchEvent;
use super::queue::BatchQueue;
use super::runner::{BatchProcessor, RunSummary};
use crate::error::{Result, SecureTransError};
use crate::models::{ConversionOptions, QueuedItem};

use std::sync::mpsc;
use std::thread;
use tracing::trace;

/// 批处理会话
pub struct BatchSession {
    queue: BatchQueue,
    processor: BatchProcessor,
}

impl BatchSession {
    pub fn new(processor: BatchProcessor) -> Self {
        BatchSession {
            queue: BatchQueue::default(),
            processor,
        }
    }

    pub fn queue(&self) -> &BatchQueue {
        &self.queue
    }

    pub fn queue_mut(&mut self) -> &mut BatchQueue {
        &mut self.queue
    }

    pub fn processor(&self) -> &BatchProcessor {
        &self.processor
    }

    /// 加载新的文件集，同时清空上一次运行
    pub fn load(&mut self, items: Vec<QueuedItem>) -> Result<()> {
        self.processor.clear()?;
        self.queue.load(items);
        Ok(())
    }

    /// 处理当前选中条目
    ///
    /// 选中条目先重置为排队状态，失败条目可重新选中后再次运行。
    /// `on_event` 在队列应用事件之后调用，可用于渲染。
    pub fn start<F>(&mut self, options: &ConversionOptions, mut on_event: F) -> Result<RunSummary>
    where
        F: FnMut(&BatchEvent, &BatchQueue),
    {
        if self.queue.selected_count() == 0 {
            return Err(SecureTransError::NothingSelected);
        }
        if self.processor.is_processing() {
            return Err(SecureTransError::AlreadyProcessing);
        }

        self.queue.reset_selected();
        let snapshot: Vec<QueuedItem> = self.queue.selected().into_iter().cloned().collect();
        let processor = &self.processor;
        let queue = &mut self.queue;
        let (tx, rx) = mpsc::channel();

        thread::scope(|scope| {
            let worker = scope.spawn(move || processor.run(&snapshot, options, &tx));

            for event in rx {
                trace!(item = ?event.item_id(), ?event, "batch event");
                queue.apply_event(&event);
                on_event(&event, queue);
            }

            worker
                .join()
                .unwrap_or_else(|_| Err(SecureTransError::Other("processing worker panicked".to_string())))
        })
    }
}
