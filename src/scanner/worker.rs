//! 规则工人
//! 从共享规则队列取规则，对固定的 (url, response) 求值并上报命中

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;

use crate::error::FinduError;
use crate::http::Response;
use crate::logger::ScanLogger;
use crate::rule::Rule;

/// 多个工人共享的规则队列
pub(crate) type RuleQueue = Arc<Mutex<mpsc::Receiver<Arc<dyn Rule>>>>;

/// 单个工人持有的上下文，一次扫描内所有工人共享同一份数据
pub(crate) struct WorkerContext {
    pub url: Arc<str>,
    pub response: Arc<Response>,
    pub queue: RuleQueue,
    pub matches: mpsc::Sender<String>,
    pub done: mpsc::Sender<usize>,
    pub checked: Arc<AtomicUsize>,
    pub cancel: CancellationToken,
    pub logger: Arc<dyn ScanLogger>,
}

/// 工人主循环：队列关闭或扫描被取消时退出，退出时发送且仅发送一次完成信号
pub(crate) async fn run_worker(id: usize, ctx: WorkerContext) {
    loop {
        let Some(rule) = next_rule(&ctx).await else {
            break;
        };

        // 求值前检查取消
        if ctx.cancel.is_cancelled() {
            break;
        }
        ctx.checked.fetch_add(1, Ordering::SeqCst);

        // 规则求值可能是重计算，放到阻塞线程池执行，避免拖住计时器
        let url = Arc::clone(&ctx.url);
        let response = Arc::clone(&ctx.response);
        let evaluation = tokio::task::spawn_blocking(move || {
            let (matched, name) = rule.evaluate(&url, &response);
            matched.then(|| name.to_string())
        });

        let found = tokio::select! {
            biased;
            _ = ctx.cancel.cancelled() => break,
            joined = evaluation => match joined {
                Ok(found) => found,
                Err(e) => {
                    let err = FinduError::AsyncTaskError(e.to_string());
                    ctx.logger.warn(&format!("[{}] 工人{}规则求值异常：{}", ctx.url, id, err));
                    None
                }
            },
        };

        if let Some(name) = found {
            // 通道满时阻塞等待，取消时放弃发送
            tokio::select! {
                biased;
                _ = ctx.cancel.cancelled() => break,
                sent = ctx.matches.send(name) => {
                    if sent.is_err() {
                        break;
                    }
                }
            }
        }
    }

    // 容量等于工人数，不会阻塞
    let _ = ctx.done.try_send(id);
}

/// 取下一条规则；队列关闭且为空或已取消时返回 None
async fn next_rule(ctx: &WorkerContext) -> Option<Arc<dyn Rule>> {
    if ctx.cancel.is_cancelled() {
        return None;
    }
    let mut queue = ctx.queue.lock().await;
    tokio::select! {
        biased;
        _ = ctx.cancel.cancelled() => None,
        rule = queue.recv() => rule,
    }
}
