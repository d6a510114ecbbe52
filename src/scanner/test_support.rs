//! 测试用桩：内存拉取器、可控规则、内存日志
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use super::scanner::Scanner;
use crate::config::ScanConfig;
use crate::error::{FdResult, FinduError};
use crate::http::{Fetcher, Response};
use crate::logger::ScanLogger;
use crate::rule::{Rule, RuleLibrary};

pub(crate) fn response(body: &str, header: &str, title: Option<&str>) -> Response {
    Response::new(200, body, header, title)
}

/// 按URL返回预置响应，未预置的URL视为拉取失败
#[derive(Debug, Clone, Default)]
pub(crate) struct StubFetcher {
    responses: HashMap<String, Response>,
}

impl StubFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with(mut self, url: &str, response: Response) -> Self {
        self.responses.insert(url.to_string(), response);
        self
    }
}

#[async_trait]
impl Fetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> FdResult<Response> {
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| FinduError::FetchError(format!("{}：connection refused", url)))
    }
}

#[derive(Debug, Clone, Copy)]
enum Target {
    Body,
    Header,
    Title,
}

/// 可注入延迟和计数的测试规则
#[derive(Debug, Clone)]
pub(crate) struct FnRule {
    name: String,
    target: Target,
    needle: String,
    delay: Option<Duration>,
    // 仅当响应体包含该标记时才延迟
    delay_marker: Option<String>,
    panics: bool,
    counter: Option<Arc<AtomicUsize>>,
}

impl FnRule {
    fn new(name: &str, target: Target, needle: &str) -> Self {
        Self {
            name: name.to_string(),
            target,
            needle: needle.to_lowercase(),
            delay: None,
            delay_marker: None,
            panics: false,
            counter: None,
        }
    }

    pub(crate) fn body_contains(name: &str, needle: &str) -> Self {
        Self::new(name, Target::Body, needle)
    }

    pub(crate) fn header_contains(name: &str, needle: &str) -> Self {
        Self::new(name, Target::Header, needle)
    }

    pub(crate) fn title_contains(name: &str, needle: &str) -> Self {
        Self::new(name, Target::Title, needle)
    }

    /// 每次求值前阻塞睡眠
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// 只在响应体包含 `marker` 时阻塞睡眠
    pub(crate) fn with_delay_when(mut self, marker: &str, delay: Duration) -> Self {
        self.delay = Some(delay);
        self.delay_marker = Some(marker.to_lowercase());
        self
    }

    /// 求值时直接 panic
    pub(crate) fn panicking(name: &str) -> Self {
        let mut rule = Self::new(name, Target::Body, "");
        rule.panics = true;
        rule
    }

    /// 每次求值时累加计数
    pub(crate) fn with_counter(mut self, counter: Arc<AtomicUsize>) -> Self {
        self.counter = Some(counter);
        self
    }
}

impl Rule for FnRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn matches(&self, _url: &str, response: &Response) -> bool {
        if let Some(counter) = &self.counter {
            counter.fetch_add(1, Ordering::SeqCst);
        }
        if self.panics {
            panic!("rule {} exploded", self.name);
        }
        if let Some(delay) = self.delay {
            let wanted = self
                .delay_marker
                .as_ref()
                .is_none_or(|marker| response.body.contains(marker.as_str()));
            if wanted {
                std::thread::sleep(delay);
            }
        }
        let haystack = match self.target {
            Target::Body => &response.body,
            Target::Header => &response.header,
            Target::Title => &response.title,
        };
        haystack.contains(&self.needle)
    }
}

pub(crate) fn library(rules: Vec<FnRule>) -> RuleLibrary {
    RuleLibrary::from_rules(rules.into_iter().map(|r| Arc::new(r) as Arc<dyn Rule>).collect())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
    Success,
}

/// 记录所有日志行，便于断言
#[derive(Debug, Clone, Default)]
pub(crate) struct MemoryLogger {
    lines: Arc<Mutex<Vec<(LogLevel, String)>>>,
}

impl MemoryLogger {
    fn push(&self, level: LogLevel, msg: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push((level, msg.to_string()));
        }
    }

    pub(crate) fn contains(&self, level: LogLevel, needle: &str) -> bool {
        self.lines
            .lock()
            .map(|lines| lines.iter().any(|(l, msg)| *l == level && msg.contains(needle)))
            .unwrap_or(false)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.lines.lock().map(|lines| lines.is_empty()).unwrap_or(true)
    }
}

impl ScanLogger for MemoryLogger {
    fn debug(&self, msg: &str) {
        self.push(LogLevel::Debug, msg);
    }

    fn info(&self, msg: &str) {
        self.push(LogLevel::Info, msg);
    }

    fn warn(&self, msg: &str) {
        self.push(LogLevel::Warn, msg);
    }

    fn error(&self, msg: &str) {
        self.push(LogLevel::Error, msg);
    }

    fn success(&self, msg: &str) {
        self.push(LogLevel::Success, msg);
    }
}

pub(crate) fn scanner_with(
    rules: RuleLibrary,
    fetcher: StubFetcher,
    logger: MemoryLogger,
    config: ScanConfig,
) -> Scanner {
    Scanner::new(Arc::new(rules), Arc::new(fetcher), Arc::new(logger), config)
        .expect("test config must be valid")
}
