use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Assistant behaviour preset selected per chat turn.
///
/// Serialized as the numeric string id the tutor service expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ChatMode {
    #[default]
    Balanced,
    Dev,
    Master,
    Crazy,
    LastMinute,
    Grounded,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown chat mode: {0}")]
pub struct UnknownChatMode(pub String);

impl ChatMode {
    pub fn id(self) -> &'static str {
        match self {
            ChatMode::Balanced => "0",
            ChatMode::Dev => "1",
            ChatMode::Master => "2",
            ChatMode::Crazy => "3",
            ChatMode::LastMinute => "4",
            ChatMode::Grounded => "5",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ChatMode::Balanced => "Balanced Mode",
            ChatMode::Dev => "Dev Mode",
            ChatMode::Master => "Master This",
            ChatMode::Crazy => "Go Crazy",
            ChatMode::LastMinute => "Last Minute",
            ChatMode::Grounded => "Grounded",
        }
    }
}

impl FromStr for ChatMode {
    type Err = UnknownChatMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0" => Ok(ChatMode::Balanced),
            "1" => Ok(ChatMode::Dev),
            "2" => Ok(ChatMode::Master),
            "3" => Ok(ChatMode::Crazy),
            "4" => Ok(ChatMode::LastMinute),
            "5" => Ok(ChatMode::Grounded),
            other => Err(UnknownChatMode(other.to_string())),
        }
    }
}

impl TryFrom<String> for ChatMode {
    type Error = UnknownChatMode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ChatMode> for String {
    fn from(mode: ChatMode) -> Self {
        mode.id().to_string()
    }
}

impl fmt::Display for ChatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
