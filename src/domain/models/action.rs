use std::path;

use super::ChatMode;

pub enum Action {
    ClearChat(ChatMode),
    FetchAzureFiles(),
    FetchChatHistory(ChatMode),
    Query(ChatMode, String),
    StartSession(),
    UploadDocuments(Vec<path::PathBuf>, bool),
}
