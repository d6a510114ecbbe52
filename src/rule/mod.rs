//! 规则模块：规则抽象、规则定义与加载
pub mod model;
pub mod loader;

// 导出核心接口
pub use self::model::{Rule, RuleSource, RuleLibrary, RuleDefinition, MatcherDefinition};
pub use self::loader::RuleLoader;
