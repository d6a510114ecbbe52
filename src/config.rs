//! 扫描配置管理,存储所有可配置项

use std::time::Duration;

use crate::error::{FdResult, FinduError};

/// 每个URL的工人数上限
pub const MAX_WORKER_COUNT: usize = 10_000;
/// 通道容量上限（tokio 有界通道的许可数上限）
pub const MAX_CHANNEL_CAPACITY: usize = tokio::sync::Semaphore::MAX_PERMITS;

/// 超时策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeoutPolicy {
    /// 静默超时：距离上一个事件（命中/工人完成）超过时长即结束，每轮循环重新计时
    #[default]
    Inactivity,
    /// 绝对截止：从规则匹配开始计时，到点即结束
    Deadline,
}

/// 扫描配置
#[derive(Debug, Clone)]
pub struct ScanConfig {
    // 每个URL的工人数
    pub worker_count: usize,
    // HTTP请求超时
    pub http_timeout: Duration,
    // 规则匹配阶段超时
    pub inactivity_timeout: Duration,
    pub timeout_policy: TimeoutPolicy,
    // 规则队列容量
    pub rule_queue_capacity: usize,
    // 命中上报通道容量
    pub match_channel_capacity: usize,
    pub user_agent: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            worker_count: 20,
            http_timeout: Duration::from_secs(10),
            inactivity_timeout: Duration::from_secs(3),
            timeout_policy: TimeoutPolicy::Inactivity,
            rule_queue_capacity: 20,
            match_channel_capacity: 20,
            user_agent: format!("rsfindu/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ScanConfig {
    /// 校验配置，任何扫描开始前调用
    pub fn validate(&self) -> FdResult<()> {
        Self::check_worker_count(self.worker_count)?;
        Self::check_capacity("规则队列容量", self.rule_queue_capacity)?;
        Self::check_capacity("命中通道容量", self.match_channel_capacity)?;
        if self.http_timeout.is_zero() {
            return Err(FinduError::InvalidConfig("HTTP超时必须大于0".to_string()));
        }
        if self.inactivity_timeout.is_zero() {
            return Err(FinduError::InvalidConfig("匹配超时必须大于0".to_string()));
        }
        Ok(())
    }

    /// 校验工人数（0个工人会导致扫描永远无法完成）
    pub fn check_worker_count(worker_count: usize) -> FdResult<()> {
        if worker_count == 0 {
            return Err(FinduError::InvalidConfig("工人数必须大于等于1".to_string()));
        }
        if worker_count > MAX_WORKER_COUNT {
            return Err(FinduError::InvalidConfig(format!(
                "工人数{}超过上限{}",
                worker_count, MAX_WORKER_COUNT
            )));
        }
        Ok(())
    }

    fn check_capacity(label: &str, capacity: usize) -> FdResult<()> {
        if capacity == 0 || capacity > MAX_CHANNEL_CAPACITY {
            return Err(FinduError::InvalidConfig(format!(
                "{}必须在1到{}之间，当前为{}",
                label, MAX_CHANNEL_CAPACITY, capacity
            )));
        }
        Ok(())
    }
}

/// 配置管理器
pub struct ConfigManager;

impl ConfigManager {
    /// 获取默认配置
    pub fn get_default() -> ScanConfig {
        ScanConfig::default()
    }

    /// 自定义配置
    pub fn custom() -> CustomConfigBuilder {
        CustomConfigBuilder::new()
    }
}

/// 配置构建器（便于自定义配置）
#[derive(Debug, Clone, Default)]
pub struct CustomConfigBuilder {
    config: ScanConfig,
}

impl CustomConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn worker_count(mut self, worker_count: usize) -> Self {
        self.config.worker_count = worker_count;
        self
    }

    pub fn http_timeout(mut self, timeout: Duration) -> Self {
        self.config.http_timeout = timeout;
        self
    }

    pub fn inactivity_timeout(mut self, timeout: Duration) -> Self {
        self.config.inactivity_timeout = timeout;
        self
    }

    pub fn timeout_policy(mut self, policy: TimeoutPolicy) -> Self {
        self.config.timeout_policy = policy;
        self
    }

    pub fn rule_queue_capacity(mut self, capacity: usize) -> Self {
        self.config.rule_queue_capacity = capacity;
        self
    }

    pub fn match_channel_capacity(mut self, capacity: usize) -> Self {
        self.config.match_channel_capacity = capacity;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// 构建并校验
    pub fn build(self) -> FdResult<ScanConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
