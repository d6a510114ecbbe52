//! 规则编译器核心
//! 将规则定义编译为可执行的指纹规则

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use regex::RegexBuilder;
use tracing::{debug, warn};

use super::pattern::{Field, FieldMatcher, FingerprintRule, Matcher};
use crate::rule::{MatcherDefinition, Rule, RuleDefinition, RuleLibrary};
use crate::error::{FdResult, FinduError};

/// 规则编译器
pub struct RuleCompiler;

impl RuleCompiler {
    /// 编译规则库，保持定义顺序
    pub fn compile(definitions: &[RuleDefinition]) -> FdResult<RuleLibrary> {
        let start = Instant::now();
        let mut rules: Vec<Arc<dyn Rule>> = Vec::with_capacity(definitions.len());
        let mut seen = HashSet::new();

        for definition in definitions {
            if !seen.insert(definition.name.as_str()) {
                // 同名规则允许存在，结果中可能出现重复名称
                warn!("规则名称重复：{}", definition.name);
            }
            let rule = Self::compile_rule(definition)?;
            rules.push(Arc::new(rule));
        }

        debug!("✅ 规则编译完成，共{}条，耗时{:?}", rules.len(), start.elapsed());

        Ok(RuleLibrary::from_rules(rules))
    }

    /// 编译单条规则
    pub fn compile_rule(definition: &RuleDefinition) -> FdResult<FingerprintRule> {
        let name = definition.name.trim();
        if name.is_empty() {
            return Err(FinduError::RuleParseError("规则名称不能为空".to_string()));
        }
        if definition.matchers.is_empty() {
            return Err(FinduError::RuleParseError(format!("规则[{}]没有任何匹配条件", name)));
        }

        let matchers = definition.matchers.iter()
            .map(|m| Self::compile_matcher(name, m))
            .collect::<FdResult<Vec<_>>>()?;

        Ok(FingerprintRule {
            name: name.to_string(),
            mode: definition.mode,
            matchers,
        })
    }

    /// 编译单个条件
    fn compile_matcher(rule_name: &str, definition: &MatcherDefinition) -> FdResult<FieldMatcher> {
        let mut candidates = Vec::new();
        if let Some(s) = &definition.contains {
            candidates.push(Matcher::Contains(s.to_lowercase()));
        }
        if let Some(s) = &definition.starts_with {
            candidates.push(Matcher::StartsWith(s.to_lowercase()));
        }
        if let Some(pattern) = &definition.regex {
            // 目标文本均为小写，正则统一忽略大小写
            let regex = RegexBuilder::new(pattern).case_insensitive(true).build()?;
            candidates.push(Matcher::Regex(regex));
        }
        if let Some(code) = definition.status {
            candidates.push(Matcher::Status(code));
        }

        if candidates.len() != 1 {
            return Err(FinduError::RuleParseError(format!(
                "规则[{}]的{}条件必须且只能包含 contains/starts_with/regex/status 之一",
                rule_name,
                definition.field.as_str()
            )));
        }
        let matcher = candidates.remove(0);

        // status 只能作用于状态码字段，文本匹配不能作用于状态码字段
        let is_status = matches!(matcher, Matcher::Status(_));
        if is_status != (definition.field == Field::Status) {
            return Err(FinduError::RuleParseError(format!(
                "规则[{}]的条件 {} 不能用于字段 {}",
                rule_name,
                matcher.describe(),
                definition.field.as_str()
            )));
        }

        Ok(FieldMatcher { field: definition.field, matcher })
    }
}
