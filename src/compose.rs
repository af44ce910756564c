use crate::extract::ArticleMetadata;

pub const GREETING: &str = "Hi!";
pub const NOT_ARTICLE_LINK: &str = "Not a WeChat artical link";
pub const CANNOT_PARSE: &str = "Cannot parse url page";
pub const SUCCESS_PREFIX: &str = "Success send message:\n";

/// Build the Markdown message published to the channel.
///
/// ```text
/// #微信 #<author>
///
/// [<title>](<url>)
/// <description>
/// ```
pub fn compose_message(tag: &str, meta: &ArticleMetadata, url: &str) -> String {
    format!(
        "{} #{}\n\n[{}]({})\n{}",
        tag, meta.author, meta.title, url, meta.description
    )
}

pub fn success_reply(message: &str) -> String {
    format!("{}{}", SUCCESS_PREFIX, message)
}
