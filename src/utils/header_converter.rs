//! Header格式转换工具
//! 把响应头拼接为规则可直接匹配的文本

use reqwest::header::HeaderMap;
use tracing::{debug, warn};

/// Header 数量上限，超出部分丢弃
const MAX_HEADER_LINES: usize = 1000;

/// Header转换工具
pub struct HeaderConverter;

impl HeaderConverter {
    /// 将HeaderMap转换为 `name:value` 行，多值头逐行展开，以换行拼接
    pub fn to_header_text(header_map: &HeaderMap) -> String {
        let mut lines = Vec::with_capacity(header_map.len());

        for (key, value) in header_map.iter() {
            if lines.len() >= MAX_HEADER_LINES {
                warn!("Header超过{}行，剩余部分被忽略", MAX_HEADER_LINES);
                break;
            }

            // 非 UTF-8 值按有损方式转换
            let value_str = String::from_utf8_lossy(value.as_bytes());
            lines.push(format!("{}:{}", key.as_str(), value_str.trim()));
        }

        debug!("Header转换完成，生成{}行", lines.len());

        lines.join("\n").to_lowercase()
    }
}
