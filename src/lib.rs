//! rsfindu - 并发 Web 指纹识别引擎
//! 每个URL只拉取一次，用固定大小的工人池对响应执行全部指纹规则

// 导出全局错误类型
pub use self::error::{FinduError, FdResult};

// 导出配置模块
pub use self::config::{
    ScanConfig, TimeoutPolicy, ConfigManager, CustomConfigBuilder, MAX_WORKER_COUNT, MAX_CHANNEL_CAPACITY,
};

// 导出日志接口
pub use self::logger::{ScanLogger, TracingLogger};

// 导出HTTP模块核心接口
pub use self::http::{Response, Fetcher, HttpFetcher, TitleExtractor, TITLE_NOT_AVAILABLE};

// 导出规则模块核心接口
pub use self::rule::{Rule, RuleSource, RuleLibrary, RuleDefinition, MatcherDefinition, RuleLoader};

// 导出编译模块核心接口
pub use self::compiler::{FingerprintRule, FieldMatcher, Field, MatchMode, Matcher, RuleCompiler};

// 导出工具模块核心接口
pub use self::utils::{HeaderConverter, UrlParser};

// 导出扫描模块核心接口
pub use self::scanner::{Scanner, BatchResult, ScanOutcome, Termination};

// 声明所有子模块
pub mod config;
pub mod error;
pub mod logger;
pub mod http;
pub mod rule;
pub mod compiler;
pub mod utils;
pub mod scanner;
