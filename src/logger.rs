//! 日志能力抽象
//! 扫描引擎不直接依赖全局日志，由调用方注入

use tracing::{debug, error, info, warn};

/// 分级日志接口
pub trait ScanLogger: Send + Sync {
    fn debug(&self, msg: &str);
    fn info(&self, msg: &str);
    fn warn(&self, msg: &str);
    fn error(&self, msg: &str);
    /// 扫描成功类消息
    fn success(&self, msg: &str);
}

/// 默认实现：转发到 tracing
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl ScanLogger for TracingLogger {
    fn debug(&self, msg: &str) {
        debug!(target: "rsfindu::scan", "{}", msg);
    }

    fn info(&self, msg: &str) {
        info!(target: "rsfindu::scan", "{}", msg);
    }

    fn warn(&self, msg: &str) {
        warn!(target: "rsfindu::scan", "{}", msg);
    }

    fn error(&self, msg: &str) {
        error!(target: "rsfindu::scan", "{}", msg);
    }

    fn success(&self, msg: &str) {
        info!(target: "rsfindu::scan", "[+] {}", msg);
    }
}
