//! 扫描模块：批量调度、单URL编排、规则工人
pub mod scanner;
pub mod orchestrator;
mod worker;

#[cfg(test)]
pub(crate) mod test_support;

// 导出核心接口
pub use self::scanner::{BatchResult, Scanner};
pub use self::orchestrator::{ScanOutcome, Termination};
