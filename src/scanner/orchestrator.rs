//! 单URL扫描编排
//! 拉取响应 -> 启动工人 -> 投喂规则 -> 收集命中 -> 判定结束

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Serialize;
use tokio::sync::{mpsc, Mutex};
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;

use super::scanner::Scanner;
use super::worker::{run_worker, WorkerContext};
use crate::config::{ScanConfig, TimeoutPolicy};
use crate::error::FdResult;
use crate::rule::Rule;

/// 单URL扫描的结束方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Termination {
    /// 所有工人都已完成，全部规则已求值
    Completed,
    /// 超时提前结束，结果可能不完整（不视为错误）
    TimedOut,
}

/// 单URL扫描结果
#[derive(Debug, Clone, Serialize)]
pub struct ScanOutcome {
    pub url: String,
    /// 命中的规则名，顺序不固定，不去重
    pub matches: Vec<String>,
    pub title: String,
    /// 投入队列的规则数
    pub pushed: usize,
    /// 实际开始求值的规则数
    pub checked: usize,
    pub termination: Termination,
}

impl Scanner {
    /// 对单个URL执行全部规则
    /// 拉取失败返回错误；超时返回已收集到的部分结果
    pub async fn check_rules(&self, url: &str, worker_count: usize) -> FdResult<ScanOutcome> {
        ScanConfig::check_worker_count(worker_count)?;

        let response = match self.fetcher.fetch(url).await {
            Ok(resp) => Arc::new(resp),
            Err(e) => {
                self.logger.error(&format!("扫描 {} 出错：{}", url, e));
                return Err(e);
            }
        };

        let config = &self.config;
        let cancel = CancellationToken::new();
        // 任何退出路径都会取消未完成的工人和投喂任务
        let _cancel_guard = cancel.clone().drop_guard();

        let (rule_tx, rule_rx) = mpsc::channel::<Arc<dyn Rule>>(config.rule_queue_capacity);
        let (match_tx, mut match_rx) = mpsc::channel::<String>(config.match_channel_capacity);
        let (done_tx, mut done_rx) = mpsc::channel::<usize>(worker_count);
        let queue = Arc::new(Mutex::new(rule_rx));
        let checked = Arc::new(AtomicUsize::new(0));
        let pushed = Arc::new(AtomicUsize::new(0));
        let shared_url: Arc<str> = Arc::from(url);

        for id in 0..worker_count {
            let ctx = WorkerContext {
                url: Arc::clone(&shared_url),
                response: Arc::clone(&response),
                queue: Arc::clone(&queue),
                matches: match_tx.clone(),
                done: done_tx.clone(),
                checked: Arc::clone(&checked),
                cancel: cancel.clone(),
                logger: Arc::clone(&self.logger),
            };
            tokio::spawn(run_worker(id, ctx));
        }
        drop(match_tx);
        drop(done_tx);

        // 投喂放在独立任务里，收集循环立即开始消费命中，避免队列与命中通道互相等待
        let source = Arc::clone(&self.rules);
        let feeder_pushed = Arc::clone(&pushed);
        let feeder_cancel = cancel.clone();
        tokio::spawn(async move {
            for rule in source.rules() {
                tokio::select! {
                    biased;
                    _ = feeder_cancel.cancelled() => break,
                    sent = rule_tx.send(Arc::clone(rule)) => {
                        if sent.is_err() {
                            break;
                        }
                    }
                }
                feeder_pushed.fetch_add(1, Ordering::SeqCst);
            }
            // rule_tx 在此释放，队列关闭
        });

        let timeout = config.inactivity_timeout;
        let deadline = Instant::now() + timeout;
        let mut outstanding = worker_count;
        let mut found = Vec::new();

        loop {
            let wake_at = match config.timeout_policy {
                TimeoutPolicy::Inactivity => Instant::now() + timeout,
                TimeoutPolicy::Deadline => deadline,
            };

            tokio::select! {
                Some(name) = match_rx.recv() => {
                    found.push(name);
                }
                Some(_) = done_rx.recv() => {
                    outstanding -= 1;
                    if outstanding == 0 {
                        // 工人先发完命中再发完成信号，这里收走通道里剩余的命中
                        while let Ok(name) = match_rx.try_recv() {
                            found.push(name);
                        }

                        let outcome = ScanOutcome {
                            url: url.to_string(),
                            matches: found,
                            title: response.title.clone(),
                            pushed: pushed.load(Ordering::SeqCst),
                            checked: checked.load(Ordering::SeqCst),
                            termination: Termination::Completed,
                        };
                        self.logger.success(&format!(
                            "[{}] 扫描完成！标题：[{}] 推送规则数：{}，检查次数：{}，命中数：{}",
                            outcome.url,
                            outcome.title,
                            outcome.pushed,
                            outcome.checked,
                            outcome.matches.len()
                        ));
                        return Ok(outcome);
                    }
                }
                _ = sleep_until(wake_at) => {
                    let outcome = ScanOutcome {
                        url: url.to_string(),
                        matches: found,
                        title: response.title.clone(),
                        pushed: pushed.load(Ordering::SeqCst),
                        checked: checked.load(Ordering::SeqCst),
                        termination: Termination::TimedOut,
                    };
                    self.logger.debug(&format!(
                        "[{}] 规则匹配超时（{:?}），返回部分结果：检查次数：{}，命中数：{}",
                        outcome.url,
                        timeout,
                        outcome.checked,
                        outcome.matches.len()
                    ));
                    return Ok(outcome);
                }
            }
        }
    }
}
