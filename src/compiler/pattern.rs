//! 编译后的匹配器与指纹规则

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::http::Response;
use crate::rule::Rule;

#[derive(Debug, Clone)]
pub enum Matcher {
    Contains(String), // 包含匹配（模式编译时已转小写）
    StartsWith(String), // 前缀匹配（模式编译时已转小写）
    Regex(Regex), // 正则匹配
    Status(u16), // 状态码精确匹配
}

impl Matcher {
    /// 文本匹配；输入已是小写文本
    pub fn is_match(&self, input: &str) -> bool {
        match self {
            Matcher::Contains(s) => input.contains(s.as_str()),
            Matcher::StartsWith(s) => input.starts_with(s.as_str()),
            Matcher::Regex(regex) => regex.is_match(input),
            Matcher::Status(_) => false,
        }
    }

    pub fn is_status_match(&self, status: u16) -> bool {
        matches!(self, Matcher::Status(code) if *code == status)
    }

    /// 规则描述
    pub fn describe(&self) -> String {
        match self {
            Matcher::Contains(s) => format!("contains \"{}\"", s),
            Matcher::StartsWith(s) => format!("starts_with \"{}\"", s),
            Matcher::Regex(r) => format!("regex /{}/", r.as_str()),
            Matcher::Status(code) => format!("status {}", code),
        }
    }
}

/// 匹配目标字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Body,
    Header,
    Title,
    Url,
    Status,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Body => "body",
            Field::Header => "header",
            Field::Title => "title",
            Field::Url => "url",
            Field::Status => "status",
        }
    }
}

/// 多个条件的组合方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// 任一条件命中即可
    #[default]
    Any,
    /// 全部条件命中
    All,
}

/// 单字段条件
#[derive(Debug, Clone)]
pub struct FieldMatcher {
    pub field: Field,
    pub matcher: Matcher,
}

impl FieldMatcher {
    fn is_match(&self, url: &str, response: &Response) -> bool {
        match self.field {
            Field::Body => self.matcher.is_match(&response.body),
            Field::Header => self.matcher.is_match(&response.header),
            Field::Title => self.matcher.is_match(&response.title),
            // URL 原样传入，这里统一转小写
            Field::Url => self.matcher.is_match(&url.to_lowercase()),
            Field::Status => self.matcher.is_status_match(response.status),
        }
    }
}

/// 编译后的指纹规则
#[derive(Debug, Clone)]
pub struct FingerprintRule {
    pub name: String,
    pub mode: MatchMode,
    pub matchers: Vec<FieldMatcher>,
}

impl Rule for FingerprintRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn matches(&self, url: &str, response: &Response) -> bool {
        match self.mode {
            MatchMode::Any => self.matchers.iter().any(|m| m.is_match(url, response)),
            MatchMode::All => self.matchers.iter().all(|m| m.is_match(url, response)),
        }
    }
}
