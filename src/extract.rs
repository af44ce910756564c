use regex::Regex;
use std::sync::LazyLock;
use tracing::error;

/// Metadata pulled out of one article page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleMetadata {
    pub title: String,
    pub image: String,
    pub description: String,
    pub author: String,
}

/// Site-specific page parser.
pub trait MetadataExtractor: Send + Sync {
    /// Hashtag that marks articles from this source in published messages.
    fn tag(&self) -> &str;

    /// Extract metadata from a page body. `None` means the layout did not
    /// match; the cause has already been logged.
    fn extract(&self, page: &str) -> Option<ArticleMetadata>;
}

// og:title, og:image, og:description, then the account name anchor, in that
// order. `.` stays on one line; the gaps may span lines.
static WECHAT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"<meta property="og:title" content="(.*?)"[\s\S]*?"#,
        r#"<meta property="og:image" content="(.*?)"[\s\S]*?"#,
        r#"<meta property="og:description" content="(.*?)"[\s\S]*?"#,
        r#"<a href="javascript:void\(0\);" id="js_name">\s*(.*?)\s*</a>"#,
    ))
    .expect("WeChat metadata pattern compiles")
});

/// Parser for `mp.weixin.qq.com` article pages.
pub struct WeChatExtractor;

impl MetadataExtractor for WeChatExtractor {
    fn tag(&self) -> &str {
        "#微信"
    }

    fn extract(&self, page: &str) -> Option<ArticleMetadata> {
        // First match wins when a page repeats its meta block.
        let Some(caps) = WECHAT_PATTERN.captures(page) else {
            error!("Error on extract meta data by regex");
            return None;
        };

        let field = |i: usize| caps.get(i).map(|m| m.as_str().to_string());
        match (field(1), field(2), field(3), field(4)) {
            (Some(title), Some(image), Some(description), Some(author)) => Some(ArticleMetadata {
                title,
                image,
                description,
                author,
            }),
            _ => {
                error!("Error on extract meta data by regex: incomplete match");
                None
            }
        }
    }
}
