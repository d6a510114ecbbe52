//! 编译模块：将规则定义编译为可执行的指纹规则
pub mod pattern;
pub mod compiler;

pub use self::pattern::{Field, FieldMatcher, FingerprintRule, MatchMode, Matcher};
pub use self::compiler::RuleCompiler;
