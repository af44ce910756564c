use url::Url;

/// Host serving WeChat public account articles.
pub const ARTICLE_HOST: &str = "mp.weixin.qq.com";

/// Path prefix shared by article pages (`/s/<id>` and `/s?__biz=...`).
pub const ARTICLE_PATH_PREFIX: &str = "/s";

/// Returns true if `text` is a WeChat article link.
///
/// The authority must be exactly the article host as written: no userinfo,
/// no port (default ones included), no subdomain, same case. Anything that
/// fails to parse is simply not a link.
pub fn is_article_link(text: &str) -> bool {
    let text = text.trim();
    let url = match Url::parse(text) {
        Ok(url) => url,
        Err(_) => return false,
    };

    matches!(url.scheme(), "http" | "https")
        && url.username().is_empty()
        && url.password().is_none()
        && url.host_str() == Some(ARTICLE_HOST)
        && raw_authority(text) == Some(ARTICLE_HOST)
        && url.path().starts_with(ARTICLE_PATH_PREFIX)
}

// `Url` lowercases the host and drops default ports, so check the text itself.
fn raw_authority(text: &str) -> Option<&str> {
    let (_, rest) = text.split_once("://")?;
    rest.split(['/', '?', '#']).next()
}
