use teloxide::prelude::*;

use crate::config::Config;

/// Only the owner's private chat may drive the bot.
pub(crate) fn is_authorized(msg: &Message, config: &Config) -> bool {
    match config.owner_chat_id() {
        Ok(owner_chat_id) => msg.chat.id == owner_chat_id,
        Err(_) => false,
    }
}
