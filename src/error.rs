//! 全局错误类型定义

use thiserror::Error;
use regex::Error as RegexError;
use serde_json::Error as SerdeJsonError;
use std::io::Error as IoError;
use url::ParseError as UrlParseError;

#[derive(Error, Debug)]
pub enum FinduError {
    // 配置相关错误
    #[error("配置无效：{0}")]
    InvalidConfig(String),

    // 规则相关错误
    #[error("规则加载失败：{0}")]
    RuleLoadError(String),
    #[error("规则解析失败：{0}")]
    RuleParseError(String),
    #[error("正则编译失败：{0}")]
    RegexCompileError(#[from] RegexError),

    // 网络相关错误
    #[error("请求失败：{0}")]
    FetchError(String),
    #[error("网络请求失败：{0}")]
    HttpError(#[from] reqwest::Error),

    // 扫描相关错误
    #[error("异步任务执行失败：{0}")]
    AsyncTaskError(String),

    // 序列化/反序列化错误
    #[error("JSON解析失败：{0}")]
    JsonError(#[from] SerdeJsonError),

    // 基础错误
    #[error("IO操作失败：{0}")]
    IoError(#[from] IoError),
    #[error("URL解析失败：{0}")]
    UrlError(#[from] UrlParseError),
    #[error("无效URL：{0}")]
    InvalidUrl(String),
}

// 全局Result类型
pub type FdResult<T> = Result<T, FinduError>;
