#[cfg(test)]
#[path = "client_test.rs"]
mod tests;

use std::path;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::multipart;
use serde::Deserialize;
use serde::Serialize;
use tokio::fs;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::AzureFilesOutcome;
use crate::domain::models::Backend;
use crate::domain::models::ChatMode;
use crate::domain::models::ClearOutcome;
use crate::domain::models::QueryOutcome;
use crate::domain::models::UploadOutcome;

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct StartSessionResponse {
    session_id: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize)]
struct QueryRequest {
    question: String,
    mode: String,
    session_id: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize)]
struct ClearChatRequest {
    mode: String,
}

pub struct ApiClient {
    url: String,
}

impl Default for ApiClient {
    fn default() -> ApiClient {
        return ApiClient {
            url: Config::get(ConfigKey::ApiURL),
        };
    }
}

#[async_trait]
impl Backend for ApiClient {
    #[allow(clippy::implicit_return)]
    async fn start_session(&self) -> Result<String> {
        let res = reqwest::Client::new()
            .post(format!("{url}/api/start-session", url = self.url))
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::error!(status = res.status().as_u16(), "Failed to start a session");
            bail!("Failed to start a session");
        }

        let payload = res.json::<StartSessionResponse>().await?;
        return Ok(payload.session_id);
    }

    #[allow(clippy::implicit_return)]
    async fn upload_documents(
        &self,
        files: &[path::PathBuf],
        save_to_azure: bool,
        session_id: &str,
    ) -> Result<UploadOutcome> {
        let mut form = multipart::Form::new()
            .text("save_to_azure", save_to_azure.to_string())
            .text("session_id", session_id.to_string());

        for file in files {
            let file_name = file
                .file_name()
                .map(|name| {
                    return name.to_string_lossy().to_string();
                })
                .unwrap_or_else(|| {
                    return "document.pdf".to_string();
                });
            let payload = fs::read(file).await?;

            form = form.part(
                "pdfs",
                multipart::Part::bytes(payload)
                    .file_name(file_name)
                    .mime_str("application/pdf")?,
            );
        }

        let res = reqwest::Client::new()
            .post(format!("{url}/api/upload", url = self.url))
            .multipart(form)
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::error!(status = res.status().as_u16(), "Failed to upload documents");
            bail!("Failed to upload documents");
        }

        return Ok(res.json::<UploadOutcome>().await?);
    }

    #[allow(clippy::implicit_return)]
    async fn query(
        &self,
        question: &str,
        mode: ChatMode,
        session_id: &str,
    ) -> Result<QueryOutcome> {
        let req = QueryRequest {
            question: question.to_string(),
            mode: mode.to_string(),
            session_id: session_id.to_string(),
        };

        let res = reqwest::Client::new()
            .post(format!("{url}/api/query", url = self.url))
            .json(&req)
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::error!(
                status = res.status().as_u16(),
                "Failed to make a query request"
            );
            bail!("Failed to make a query request");
        }

        return Ok(res.json::<QueryOutcome>().await?);
    }

    #[allow(clippy::implicit_return)]
    async fn chat_history(&self, mode: ChatMode) -> Result<QueryOutcome> {
        let res = reqwest::Client::new()
            .get(format!(
                "{url}/api/chat-history?mode={mode}",
                url = self.url
            ))
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::error!(
                status = res.status().as_u16(),
                "Failed to fetch the chat history"
            );
            bail!("Failed to fetch the chat history");
        }

        return Ok(res.json::<QueryOutcome>().await?);
    }

    #[allow(clippy::implicit_return)]
    async fn azure_files(&self) -> Result<AzureFilesOutcome> {
        let res = reqwest::Client::new()
            .get(format!("{url}/api/azure-files", url = self.url))
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::error!(
                status = res.status().as_u16(),
                "Failed to list azure files"
            );
            bail!("Failed to list azure files");
        }

        return Ok(res.json::<AzureFilesOutcome>().await?);
    }

    #[allow(clippy::implicit_return)]
    async fn clear_chat(&self, mode: ChatMode) -> Result<ClearOutcome> {
        let req = ClearChatRequest {
            mode: mode.to_string(),
        };

        let res = reqwest::Client::new()
            .post(format!("{url}/api/clear-chat", url = self.url))
            .json(&req)
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::error!(status = res.status().as_u16(), "Failed to clear the chat");
            bail!("Failed to clear the chat");
        }

        return Ok(res.json::<ClearOutcome>().await?);
    }
}
