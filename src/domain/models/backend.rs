use std::path;

use anyhow::Result;
use async_trait::async_trait;
use serde_derive::Deserialize;

use super::ChatMode;
use super::Message;

const SUCCESS_STATUS: &str = "success";

/// Response payload for both `query` and `chat_history`: the server returns
/// the full conversation it now holds. Its ordering is authoritative.
#[derive(Default, Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QueryOutcome {
    pub status: String,
    #[serde(default)]
    pub chat_history: Vec<Message>,
}

impl QueryOutcome {
    pub fn is_success(&self) -> bool {
        return self.status == SUCCESS_STATUS;
    }
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadOutcome {
    pub status: String,
    pub message: String,
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        return self.status == SUCCESS_STATUS;
    }
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AzureFilesOutcome {
    pub status: String,
    pub files_count: u64,
}

impl AzureFilesOutcome {
    pub fn is_success(&self) -> bool {
        return self.status == SUCCESS_STATUS;
    }
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClearOutcome {
    pub status: String,
}

impl ClearOutcome {
    pub fn is_success(&self) -> bool {
        return self.status == SUCCESS_STATUS;
    }
}

#[async_trait]
pub trait Backend {
    /// Requests an opaque session identifier from the service. Every
    /// mutating call is scoped by it.
    async fn start_session(&self) -> Result<String>;

    /// Sends a set of PDFs for ingestion, optionally persisting them to
    /// Azure Blob Storage as well.
    async fn upload_documents(
        &self,
        files: &[path::PathBuf],
        save_to_azure: bool,
        session_id: &str,
    ) -> Result<UploadOutcome>;

    /// Asks a question against the given document corpus. On success the
    /// returned history includes the question and its answer.
    async fn query(
        &self,
        question: &str,
        mode: ChatMode,
        session_id: &str,
    ) -> Result<QueryOutcome>;

    /// Fetches the server-held conversation for a mode.
    async fn chat_history(&self, mode: ChatMode) -> Result<QueryOutcome>;

    /// Counts the documents currently persisted in Azure Blob Storage.
    async fn azure_files(&self) -> Result<AzureFilesOutcome>;

    /// Drops the server-held conversation for a mode.
    async fn clear_chat(&self, mode: ChatMode) -> Result<ClearOutcome>;
}

pub type BackendBox = Box<dyn Backend + Send + Sync>;
