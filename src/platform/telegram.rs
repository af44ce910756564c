use std::sync::Arc;

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::{LinkPreviewOptions, MessageId, ParseMode, Recipient};
use tracing::{error, info, warn};

use crate::config::{Channel, TelegramConfig};
use crate::platform::{IncomingMessage, Outbound};
use crate::relay::Relay;

/// Destination channel, injected into the handler
#[derive(Debug, Clone)]
struct Destination(Recipient);

fn recipient(channel: Channel) -> Recipient {
    match channel {
        Channel::Id(id) => Recipient::Id(ChatId(id)),
        Channel::Username(name) => Recipient::ChannelUsername(name),
    }
}

fn no_preview() -> LinkPreviewOptions {
    LinkPreviewOptions {
        is_disabled: true,
        url: None,
        prefer_small_media: false,
        prefer_large_media: false,
        show_above_text: false,
    }
}

/// Run the Telegram bot platform
pub async fn run(relay: Arc<Relay>, config: &TelegramConfig) -> Result<()> {
    let bot = Bot::new(&config.bot_token);
    let destination = Destination(recipient(config.channel()));

    info!("Starting Telegram platform...");

    let handler = Update::filter_message().endpoint(handle_message);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![relay, destination])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd.id);
        })
        .error_handler(LoggingErrorHandler::with_custom_text("telegram"))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}

async fn handle_message(
    bot: Bot,
    msg: Message,
    relay: Arc<Relay>,
    destination: Destination,
) -> ResponseResult<()> {
    let incoming = IncomingMessage {
        chat_id: msg.chat.id.0,
        message_id: msg.id.0,
        text: msg.text().map(str::to_string),
    };

    for action in relay.handle(&incoming).await {
        deliver(&bot, &destination, action).await;
    }

    Ok(())
}

/// Telegram-level form of an outbound action
#[derive(Debug, Clone, PartialEq)]
enum Delivery {
    Send {
        to: Recipient,
        text: String,
    },
    Forward {
        to: ChatId,
        from: ChatId,
        message_id: MessageId,
    },
}

fn route(destination: &Destination, action: Outbound) -> Delivery {
    match action {
        Outbound::Reply { chat_id, text } => Delivery::Send {
            to: Recipient::Id(ChatId(chat_id)),
            text,
        },
        Outbound::Forward {
            to,
            from_chat_id,
            message_id,
        } => Delivery::Forward {
            to: ChatId(to),
            from: ChatId(from_chat_id),
            message_id: MessageId(message_id),
        },
        Outbound::Publish { text } => Delivery::Send {
            to: destination.0.clone(),
            text,
        },
    }
}

/// Execute one outbound action. Failures are logged and do not stop the
/// remaining actions.
async fn deliver(bot: &Bot, destination: &Destination, action: Outbound) {
    let result = match route(destination, action) {
        Delivery::Send { to, text } => send_markdown(bot, to, &text).await.map(|_| ()),
        Delivery::Forward {
            to,
            from,
            message_id,
        } => bot
            .forward_message(to, from, message_id)
            .await
            .map(|_| ()),
    };

    if let Err(e) = result {
        error!("Failed to deliver message: {}", e);
    }
}

// The composed template is legacy Markdown, not MarkdownV2.
#[allow(deprecated)]
async fn send_markdown(bot: &Bot, to: Recipient, text: &str) -> ResponseResult<Message> {
    bot.send_message(to, text)
        .parse_mode(ParseMode::Markdown)
        .link_preview_options(no_preview())
        .await
}
