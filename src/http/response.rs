//! 归一化后的HTTP响应模型
//! 每个URL只生成一次，扫描期间只读，供所有工人并发读取

use serde::Serialize;

/// 页面无标题时的占位值
pub const TITLE_NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Response {
    pub status: u16,
    /// 小写响应体
    pub body: String,
    /// 小写 `name:value` 行，以换行拼接
    pub header: String,
    /// 小写标题，缺失时为 "N/A"（占位值本身不转小写）
    pub title: String,
}

impl Response {
    /// 创建并归一化（统一小写，空标题回落为 N/A）
    pub fn new(status: u16, body: &str, header: &str, title: Option<&str>) -> Self {
        let title = match title.map(str::trim) {
            Some(t) if !t.is_empty() => t.to_lowercase(),
            _ => TITLE_NOT_AVAILABLE.to_string(),
        };

        Self {
            status,
            body: body.to_lowercase(),
            header: header.to_lowercase(),
            title,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_normalized() {
        let resp = Response::new(200, "<B>WordPress</B>", "Server:NGINX", Some("  Hello World "));
        assert_eq!(resp.body, "<b>wordpress</b>");
        assert_eq!(resp.header, "server:nginx");
        assert_eq!(resp.title, "hello world");
    }

    #[test]
    fn test_missing_title_falls_back() {
        let resp = Response::new(404, "", "", None);
        assert_eq!(resp.title, TITLE_NOT_AVAILABLE);

        let blank = Response::new(200, "", "", Some("   "));
        assert_eq!(blank.title, TITLE_NOT_AVAILABLE);
    }
}
