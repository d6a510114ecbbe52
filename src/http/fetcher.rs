//! HTTP 拉取
//! 每个URL只请求一次，不重试

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use tracing::debug;

use super::response::Response;
use super::title_extractor::TitleExtractor;
use crate::config::ScanConfig;
use crate::error::{FdResult, FinduError};
use crate::utils::HeaderConverter;

/// 响应拉取接口，需支持多个URL任务并发调用
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> FdResult<Response>;
}

/// 基于 reqwest 的默认实现
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &ScanConfig) -> FdResult<Self> {
        let client = Self::client_builder(config).build()?;
        Ok(Self { client })
    }

    /// 按配置设置请求超时和 User-Agent
    pub(crate) fn client_builder(config: &ScanConfig) -> ClientBuilder {
        Client::builder()
            .timeout(config.http_timeout)
            .user_agent(config.user_agent.clone())
    }

    /// 复用外部 Client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FdResult<Response> {
        let resp = self.client.get(url)
            .send()
            .await
            .map_err(|e| FinduError::FetchError(format!("{}：{}", url, e)))?;

        // 非2xx状态码同样是有效响应，照常记录
        let status = resp.status().as_u16();
        let header = HeaderConverter::to_header_text(resp.headers());

        let body = resp.bytes()
            .await
            .map_err(|e| FinduError::FetchError(format!("{} 读取响应体失败：{}", url, e)))?;
        let body = String::from_utf8_lossy(&body);
        let title = TitleExtractor::extract(&body);

        debug!("拉取完成：{}，状态码：{}，响应体{}字节", url, status, body.len());

        Ok(Response::new(status, &body, &header, title.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigManager;
    use crate::http::response::TITLE_NOT_AVAILABLE;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    // 本地 mock 服务不走环境代理
    fn fetcher_for(config: &ScanConfig) -> HttpFetcher {
        let client = HttpFetcher::client_builder(config).no_proxy().build().unwrap();
        HttpFetcher::with_client(client)
    }

    fn test_fetcher() -> HttpFetcher {
        fetcher_for(&ConfigManager::get_default())
    }

    #[tokio::test]
    async fn test_fetch_normalizes_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Server", "NGINX")
                    .insert_header("X-Powered-By", "PHP/8.1")
                    .set_body_string("<html><head><title>Hello WordPress</title></head><body>WP-CONTENT</body></html>"),
            )
            .mount(&server)
            .await;

        let fetcher = test_fetcher();
        let resp = fetcher.fetch(&format!("{}/", server.uri())).await.unwrap();

        assert_eq!(resp.status, 200);
        assert!(resp.body.contains("wp-content"));
        assert!(resp.header.contains("server:nginx"));
        assert!(resp.header.contains("x-powered-by:php/8.1"));
        assert_eq!(resp.title, "hello wordpress");
    }

    #[tokio::test]
    async fn test_fetch_non_success_status_is_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        let fetcher = test_fetcher();
        let resp = fetcher.fetch(&server.uri()).await.unwrap();

        assert_eq!(resp.status, 404);
        assert_eq!(resp.title, TITLE_NOT_AVAILABLE);
    }

    #[tokio::test]
    async fn test_fetch_connection_error() {
        let fetcher = test_fetcher();
        // 端口1上不会有服务
        let result = fetcher.fetch("http://127.0.0.1:1/").await;
        assert!(matches!(result, Err(FinduError::FetchError(_))));
    }

    #[tokio::test]
    async fn test_fetch_times_out_with_short_http_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let config = ConfigManager::custom()
            .http_timeout(Duration::from_millis(200))
            .build()
            .unwrap();
        let fetcher = fetcher_for(&config);

        let start = std::time::Instant::now();
        let result = fetcher.fetch(&server.uri()).await;
        assert!(matches!(result, Err(FinduError::FetchError(_))));
        assert!(start.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_fetch_sends_configured_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("user-agent", "rsfindu-test/1.0"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let config = ConfigManager::custom().user_agent("rsfindu-test/1.0").build().unwrap();
        let resp = fetcher_for(&config).fetch(&server.uri()).await.unwrap();
        assert_eq!(resp.status, 200);
    }
}
