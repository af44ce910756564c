pub mod telegram;

/// A message received from the chat platform
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    /// Chat the message came from; also identifies the sender in private chats
    pub chat_id: i64,
    /// Platform message id, needed to forward the message verbatim
    pub message_id: i32,
    /// The message text, if any
    pub text: Option<String>,
}

/// Something the relay wants the platform to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// Status reply to the sender
    Reply { chat_id: i64, text: String },
    /// Forward the original message untouched
    Forward {
        to: i64,
        from_chat_id: i64,
        message_id: i32,
    },
    /// Post to the configured destination channel
    Publish { text: String },
}
