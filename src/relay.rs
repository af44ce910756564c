use tracing::{debug, info, warn};

use crate::compose::{self, CANNOT_PARSE, GREETING, NOT_ARTICLE_LINK};
use crate::config::TelegramConfig;
use crate::extract::MetadataExtractor;
use crate::fetch::PageFetcher;
use crate::link;
use crate::platform::{IncomingMessage, Outbound};

/// The message pipeline: classify, fetch, extract, compose.
/// Platform-agnostic — receives IncomingMessage, returns the actions to take.
pub struct Relay {
    config: TelegramConfig,
    fetcher: Box<dyn PageFetcher>,
    extractor: Box<dyn MetadataExtractor>,
}

impl Relay {
    pub fn new(
        config: TelegramConfig,
        fetcher: Box<dyn PageFetcher>,
        extractor: Box<dyn MetadataExtractor>,
    ) -> Self {
        Self {
            config,
            fetcher,
            extractor,
        }
    }

    pub async fn handle(&self, msg: &IncomingMessage) -> Vec<Outbound> {
        let text = match msg.text.as_deref() {
            Some(t) if !t.trim().is_empty() => t,
            _ => {
                warn!("Receive an empty message from {}", msg.chat_id);
                return Vec::new();
            }
        };

        if is_start_command(text) {
            return vec![Outbound::Reply {
                chat_id: msg.chat_id,
                text: GREETING.to_string(),
            }];
        }

        if let Some(forward_to) = self.config.forward_to {
            if msg.chat_id != forward_to {
                warn!(
                    "Receive a message from {}; forward to user {}",
                    msg.chat_id, forward_to
                );
                return vec![Outbound::Forward {
                    to: forward_to,
                    from_chat_id: msg.chat_id,
                    message_id: msg.message_id,
                }];
            }
        }

        info!("Receive a message: {}", text);

        let url = text.trim();
        if !link::is_article_link(url) {
            warn!("Not a WeChat article link: {}", url);
            return vec![Outbound::Reply {
                chat_id: msg.chat_id,
                text: NOT_ARTICLE_LINK.to_string(),
            }];
        }

        let Some(message) = self.build_message(url).await else {
            return vec![Outbound::Reply {
                chat_id: msg.chat_id,
                text: CANNOT_PARSE.to_string(),
            }];
        };

        let mut actions = vec![Outbound::Reply {
            chat_id: msg.chat_id,
            text: compose::success_reply(&message),
        }];

        if self.config.dry_run {
            info!("Dry run; not publishing: {}", message);
        } else {
            info!("Forward a message: {}", message);
            actions.push(Outbound::Publish { text: message });
        }

        actions
    }

    async fn build_message(&self, url: &str) -> Option<String> {
        let page = self.fetcher.fetch(url).await?;
        let meta = self.extractor.extract(&page)?;
        debug!("Extracted '{}' by {} (cover {})", meta.title, meta.author, meta.image);
        Some(compose::compose_message(self.extractor.tag(), &meta, url))
    }
}

fn is_start_command(text: &str) -> bool {
    let command = text.split_whitespace().next().unwrap_or_default();
    command == "/start" || command.starts_with("/start@")
}
