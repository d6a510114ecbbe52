//! 规则抽象与规则库
//! 扫描引擎只依赖 `Rule::evaluate` 这一个契约

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::compiler::{Field, MatchMode};
use crate::http::Response;

/// 指纹规则：一个具名谓词
/// 多个工人会并发调用同一条规则，实现必须无内部可变状态或自行同步
pub trait Rule: Send + Sync {
    fn name(&self) -> &str;

    fn matches(&self, url: &str, response: &Response) -> bool;

    /// 对 (url, response) 求值，返回 (是否命中, 规则名)
    fn evaluate(&self, url: &str, response: &Response) -> (bool, &str) {
        (self.matches(url, response), self.name())
    }
}

/// 规则来源：有序、扫描期间不可变
pub trait RuleSource: Send + Sync {
    fn rules(&self) -> &[Arc<dyn Rule>];
}

/// 有序规则库
#[derive(Clone, Default)]
pub struct RuleLibrary {
    rules: Vec<Arc<dyn Rule>>,
}

impl RuleLibrary {
    pub fn from_rules(rules: Vec<Arc<dyn Rule>>) -> Self {
        Self { rules }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// 全部规则名（按加载顺序）
    pub fn names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Rule>> {
        self.rules.iter()
    }
}

impl RuleSource for RuleLibrary {
    fn rules(&self) -> &[Arc<dyn Rule>] {
        &self.rules
    }
}

impl fmt::Debug for RuleLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleLibrary")
            .field("rules", &self.names())
            .finish()
    }
}

/// 规则定义（从 JSON 解析，尚未编译）
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RuleDefinition {
    pub name: String,
    #[serde(default)]
    pub mode: MatchMode,
    #[serde(default)]
    pub matchers: Vec<MatcherDefinition>,
}

/// 条件定义，`contains` / `starts_with` / `regex` / `status` 四选一
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MatcherDefinition {
    pub field: Field,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contains: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starts_with: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}
