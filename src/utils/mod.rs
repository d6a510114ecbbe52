//! 工具模块
pub mod header_converter;
pub mod url_parser;

pub use self::header_converter::HeaderConverter;
pub use self::url_parser::UrlParser;
