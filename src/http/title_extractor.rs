//! 页面标题提取器
//! 基于 html5ever 分词器，只取第一个 <title> 的文本

use std::cell::{Cell, RefCell};
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts
};
use tendril::StrTendril;

#[derive(Debug, Default, Clone)]
pub struct TitleExtractor {
    in_title: Cell<bool>,
    done: Cell<bool>,
    title: RefCell<String>,
}

impl TokenSink for TitleExtractor {
    type Handle = ();

    fn process_token(&self, token: Token, _line: u64) -> TokenSinkResult<()> {
        if self.done.get() {
            return TokenSinkResult::Continue;
        }

        match token {
            Token::TagToken(Tag { kind, name, .. }) if &*name == "title" => match kind {
                TagKind::StartTag => self.in_title.set(true),
                TagKind::EndTag => {
                    if self.in_title.get() {
                        self.in_title.set(false);
                        self.done.set(true);
                    }
                }
            },
            Token::CharacterTokens(text) if self.in_title.get() => {
                self.title.borrow_mut().push_str(&text);
            }
            _ => {}
        }
        TokenSinkResult::Continue
    }
}

impl TitleExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从HTML字符串提取标题，未找到或为空时返回 None
    pub fn extract(html: &str) -> Option<String> {
        let tokenizer = Tokenizer::new(Self::new(), TokenizerOpts::default());
        let queue = BufferQueue::default();
        queue.push_back(StrTendril::from(html));

        let _ = tokenizer.feed(&queue);
        tokenizer.end();

        let sink = tokenizer.sink;
        // 未闭合的 <title> 不算有效标题
        if !sink.done.get() {
            return None;
        }
        let title = sink.title.into_inner();
        let title = title.split_whitespace().collect::<Vec<_>>().join(" ");
        if title.is_empty() { None } else { Some(title) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_title() {
        let html = r#"
            <html><head>
            <meta name="generator" content="WordPress 6.0" />
            <TITLE>  My   Blog </TITLE>
            <title>second</title>
            </head></html>
        "#;
        assert_eq!(TitleExtractor::extract(html), Some("My Blog".to_string()));
    }

    #[test]
    fn test_missing_or_empty_title() {
        assert_eq!(TitleExtractor::extract("<html><body>hi</body></html>"), None);
        assert_eq!(TitleExtractor::extract("<title>   </title>"), None);
        assert_eq!(TitleExtractor::extract("<title>unclosed"), None);
    }

    #[test]
    fn test_entities_decoded() {
        assert_eq!(TitleExtractor::extract("<title>A &amp; B</title>"), Some("A & B".to_string()));
    }
}
