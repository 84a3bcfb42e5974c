#[cfg(test)]
#[path = "mode_test.rs"]
mod tests;

use anyhow::bail;
use anyhow::Result;
use serde_derive::Deserialize;
use serde_derive::Serialize;
use strum::EnumVariantNames;

/// Which document corpus a chat surface targets: PDFs uploaded for this
/// session only, or PDFs persisted to Azure Blob Storage.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumVariantNames, strum::Display, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ChatMode {
    Upload,
    Azure,
}

impl ChatMode {
    pub fn parse(text: &str) -> Result<ChatMode> {
        match text {
            "upload" => return Ok(ChatMode::Upload),
            "azure" => return Ok(ChatMode::Azure),
            _ => bail!(format!("There is no chat mode named {text}")),
        }
    }

    pub fn toggle(&self) -> ChatMode {
        match self {
            ChatMode::Upload => return ChatMode::Azure,
            ChatMode::Azure => return ChatMode::Upload,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ChatMode::Upload => return "Local Document Chat",
            ChatMode::Azure => return "Azure Document Chat",
        }
    }
}
