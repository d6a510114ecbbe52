//! 目标URL解析
//! 支持逗号分隔的URL列表和按行存放的URL文件

use std::path::Path;
use url::Url;

use crate::error::{FdResult, FinduError};

pub struct UrlParser;

impl UrlParser {
    /// 解析逗号分隔的URL列表，遇到第一个非法URL即返回错误
    pub fn parse_list(urls: &str) -> FdResult<Vec<String>> {
        urls.split(',')
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(Self::validate)
            .collect()
    }

    /// 从文件读取URL：每行一个，忽略空行和 # 注释
    pub async fn from_file(path: &Path) -> FdResult<Vec<String>> {
        let content = tokio::fs::read_to_string(path).await?;
        Self::parse_lines(&content)
    }

    pub fn parse_lines(content: &str) -> FdResult<Vec<String>> {
        content.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(Self::validate)
            .collect()
    }

    /// 校验单个URL：必须是带主机名的 http/https 地址
    pub fn validate(raw: &str) -> FdResult<String> {
        let url = Url::parse(raw)?;
        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(FinduError::InvalidUrl(format!(
                    "{}（不支持的协议 {}，格式：[http|https]://www.example.com）",
                    raw, other
                )));
            }
        }
        if url.host_str().is_none_or(str::is_empty) {
            return Err(FinduError::InvalidUrl(format!("{}（缺少主机名）", raw)));
        }
        Ok(raw.to_string())
    }
}
