/*!
 * 选区变化防抖
 *
 * 把一阵连续的选区变化合并成最多一次摘要调用：
 * 每次通知替换单槽位的待触发任务，只有最后一次能活过静默间隔。
 * 空白选区立即清空汇点并丢弃待触发任务，不启动生命周期。
 *
 * 只有尚未触发的定时任务才会被中止；静默期一过，任务先把自己
 * 移出槽位再进入摘要流程，在途请求的取消完全交给摘要器的令牌。
 */

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::panel::SummarySink;
use crate::summarizer::Summarizer;

/// 宿主发来的选区变化通知
#[derive(Debug, Clone)]
pub struct SelectionEvent {
    /// 选区内的文本；空选区为空字符串
    pub text: String,
}

impl SelectionEvent {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

struct PendingTimer {
    generation: u64,
    handle: JoinHandle<()>,
}

struct PendingSlot {
    next_generation: u64,
    timer: Option<PendingTimer>,
}

pub struct SelectionDebouncer {
    summarizer: Arc<Summarizer>,
    sink: Arc<SummarySink>,
    quiet: Duration,
    /// 单槽位定时任务；新通知到达即中止替换，触发后任务自行出槽
    pending: Arc<Mutex<PendingSlot>>,
}

impl SelectionDebouncer {
    pub fn new(summarizer: Arc<Summarizer>, sink: Arc<SummarySink>, quiet: Duration) -> Self {
        Self {
            summarizer,
            sink,
            quiet,
            pending: Arc::new(Mutex::new(PendingSlot {
                next_generation: 0,
                timer: None,
            })),
        }
    }

    /// 选区变化入口。必须在 tokio 运行时上下文内调用。
    pub fn on_selection_changed(&self, event: SelectionEvent) {
        let mut slot = self.pending.lock();
        if let Some(timer) = slot.timer.take() {
            timer.handle.abort();
        }

        if event.is_blank() {
            // 没有可摘要的内容，不是错误
            self.sink.clear();
            return;
        }

        slot.next_generation += 1;
        let generation = slot.next_generation;
        let summarizer = self.summarizer.clone();
        let pending = self.pending.clone();
        let quiet = self.quiet;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(quiet).await;

            // 静默期已过：把自己移出槽位，之后的通知不能再中止本任务
            {
                let mut slot = pending.lock();
                let is_current = slot
                    .timer
                    .as_ref()
                    .is_some_and(|timer| timer.generation == generation);
                if !is_current {
                    // 已被更新的通知取代
                    return;
                }
                slot.timer = None;
            }

            summarizer.run(event.text).await;
        });

        slot.timer = Some(PendingTimer { generation, handle });
    }

    /// 丢弃待触发任务（宿主停用时调用）
    pub fn cancel_pending(&self) {
        if let Some(timer) = self.pending.lock().timer.take() {
            timer.handle.abort();
        }
    }
}
