//! 规则加载管理器
//! 负责从内置规则、本地文件或字符串加载规则库

use std::path::Path;
use tracing::debug;

use super::model::{RuleDefinition, RuleLibrary};
use crate::compiler::RuleCompiler;
use crate::error::{FdResult, FinduError};

/// 内置默认规则
const DEFAULT_RULES_JSON: &str = include_str!("../../data/default_rules.json");

/// 规则加载管理器
pub struct RuleLoader;

impl RuleLoader {
    /// 加载内置默认规则库
    pub fn load_default() -> FdResult<RuleLibrary> {
        let rule_lib = Self::from_json_str(DEFAULT_RULES_JSON)?;
        debug!("内置规则加载成功，规则数：{}", rule_lib.len());
        Ok(rule_lib)
    }

    /// 从本地 JSON 文件加载
    pub async fn from_path(path: &Path) -> FdResult<RuleLibrary> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            FinduError::RuleLoadError(format!("读取规则文件 {} 失败：{}", path.display(), e))
        })?;
        let rule_lib = Self::from_json_str(&content)?;
        debug!("规则文件 {} 加载成功，规则数：{}", path.display(), rule_lib.len());
        Ok(rule_lib)
    }

    /// 从 JSON 字符串解析并编译
    pub fn from_json_str(content: &str) -> FdResult<RuleLibrary> {
        let definitions: Vec<RuleDefinition> = serde_json::from_str(content)?;
        RuleCompiler::compile(&definitions)
    }
}
