//! 扫描器：批量调度多个URL并汇总结果
use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinSet;

use crate::config::ScanConfig;
use crate::error::{FdResult, FinduError};
use crate::http::{Fetcher, HttpFetcher};
use crate::logger::{ScanLogger, TracingLogger};
use crate::rule::RuleSource;

/// 批量扫描结果：URL -> 命中的规则名
/// 拉取失败的URL不会出现在结果中
pub type BatchResult = HashMap<String, Vec<String>>;

/// 指纹扫描器
/// 规则库、拉取器、日志均由外部注入，扫描期间只读
#[derive(Clone)]
pub struct Scanner {
    pub(crate) rules: Arc<dyn RuleSource>,
    pub(crate) fetcher: Arc<dyn Fetcher>,
    pub(crate) logger: Arc<dyn ScanLogger>,
    pub(crate) config: ScanConfig,
}

impl Scanner {
    /// 创建扫描器（配置不合法时直接报错）
    pub fn new(
        rules: Arc<dyn RuleSource>,
        fetcher: Arc<dyn Fetcher>,
        logger: Arc<dyn ScanLogger>,
        config: ScanConfig,
    ) -> FdResult<Self> {
        config.validate()?;
        Ok(Self {
            rules,
            fetcher,
            logger,
            config,
        })
    }

    /// 使用默认 HTTP 拉取器和 tracing 日志
    pub fn with_defaults(rules: Arc<dyn RuleSource>, config: ScanConfig) -> FdResult<Self> {
        let fetcher = Arc::new(HttpFetcher::new(&config)?);
        Self::new(rules, fetcher, Arc::new(TracingLogger), config)
    }

    /// 按配置中的工人数扫描
    pub async fn scan_urls(&self, urls: &[String]) -> FdResult<BatchResult> {
        self.scan(urls, self.config.worker_count).await
    }

    /// 并发扫描所有URL，等待全部完成（或各自超时）后返回
    /// 单个URL失败不影响其他URL
    pub async fn scan(&self, urls: &[String], worker_count: usize) -> FdResult<BatchResult> {
        ScanConfig::check_worker_count(worker_count)?;
        self.logger.debug(&format!("[*] 当前每个URL工人数：{}", worker_count));

        let result = Arc::new(Mutex::new(BatchResult::new()));
        let mut tasks = JoinSet::new();

        for url in urls {
            let scanner = self.clone();
            let url = url.clone();
            let result = Arc::clone(&result);
            tasks.spawn(async move {
                scanner.logger.debug(&format!("[*] 开始扫描 {}", url));
                // 拉取失败已在 check_rules 中记录日志，这里直接跳过
                if let Ok(outcome) = scanner.check_rules(&url, worker_count).await {
                    result.lock().await.insert(url, outcome.matches);
                }
            });
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                let err = FinduError::AsyncTaskError(e.to_string());
                self.logger.error(&format!("扫描任务异常退出：{}", err));
            }
        }

        // 所有任务已结束，不会再有写入
        let mut guard = result.lock().await;
        Ok(std::mem::take(&mut *guard))
    }
}
