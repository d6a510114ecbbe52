//! HTTP模块：拉取目标并生成归一化响应
pub mod response;
pub mod fetcher;
pub mod title_extractor;

pub use self::response::{Response, TITLE_NOT_AVAILABLE};
pub use self::fetcher::{Fetcher, HttpFetcher};
pub use self::title_extractor::TitleExtractor;
