#[cfg(test)]
#[path = "message_test.rs"]
mod tests;

use chrono::Local;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::Author;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageType {
    #[default]
    Normal,
    Error,
}

/// A single chat entry. Server histories deserialize straight into this, so
/// the wire names (`role`, `content`) are mapped onto the field names used
/// throughout the app.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "role")]
    pub author: Author,
    #[serde(rename = "content")]
    pub text: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(skip)]
    mtype: MessageType,
}

impl Message {
    pub fn new(author: Author, text: &str) -> Message {
        return Message {
            author,
            text: text.to_string().replace('\t', "  "),
            timestamp: Local::now().format("%H:%M:%S").to_string(),
            mtype: MessageType::Normal,
        };
    }

    pub fn new_with_type(author: Author, mtype: MessageType, text: &str) -> Message {
        return Message {
            author,
            text: text.to_string().replace('\t', "  "),
            timestamp: Local::now().format("%H:%M:%S").to_string(),
            mtype,
        };
    }

    pub fn message_type(&self) -> MessageType {
        return self.mtype;
    }
}
