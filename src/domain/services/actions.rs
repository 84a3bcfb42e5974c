#[cfg(test)]
#[path = "actions_test.rs"]
mod tests;

use std::path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::time;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Action;
use crate::domain::models::BackendBox;
use crate::domain::models::ChatMode;
use crate::domain::models::Event;

const UPLOAD_STATUS_TTL: Duration = Duration::from_secs(5);

pub fn help_text() -> String {
    let text = r#"
COMMANDS:
- /upload (/u) [--azure] FILE... - Uploads PDF documents for this session. Pass --azure to also persist them to Azure Blob Storage. Local Document Chat only.
- /clear - Clears the chat history for the current tab.
- /help (/h) - Provides this help menu.
- /quit /exit (/q) - Exit Medichat.

HOTKEYS:
- Tab - Switch between the Local and Azure document chats.
- Up arrow - Scroll up
- Down arrow - Scroll down
- CTRL+U - Page up
- CTRL+D - Page down
- CTRL+C - Exit Medichat.
        "#;

    return text.trim().to_string();
}

async fn start_session(backend: &BackendBox, tx: &mpsc::UnboundedSender<Event>) -> Result<()> {
    match backend.start_session().await {
        Ok(session_id) => {
            Config::set(ConfigKey::SessionID, &session_id);
            tx.send(Event::SessionReady(session_id))?;
        }
        Err(err) => {
            // The surfaces stay on their loading screen; there is no retry.
            tracing::error!(error = ?err, "failed to start a session");
        }
    }

    return Ok(());
}

async fn fetch_chat_history(
    backend: &BackendBox,
    tx: &mpsc::UnboundedSender<Event>,
    mode: ChatMode,
) -> Result<()> {
    let res = backend.chat_history(mode).await;
    tx.send(Event::ChatHistoryLoaded(mode, res))?;

    return Ok(());
}

async fn fetch_azure_files(backend: &BackendBox, tx: &mpsc::UnboundedSender<Event>) -> Result<()> {
    let res = backend.azure_files().await;
    tx.send(Event::AzureFilesLoaded(res))?;

    return Ok(());
}

async fn query(
    backend: &BackendBox,
    tx: &mpsc::UnboundedSender<Event>,
    mode: ChatMode,
    question: String,
) -> Result<()> {
    let session_id = Config::get(ConfigKey::SessionID);
    let res = backend.query(&question, mode, &session_id).await;
    tx.send(Event::QueryCompleted(mode, res))?;

    return Ok(());
}

async fn clear_chat(
    backend: &BackendBox,
    tx: &mpsc::UnboundedSender<Event>,
    mode: ChatMode,
) -> Result<()> {
    let res = backend.clear_chat(mode).await;
    tx.send(Event::ChatCleared(mode, res))?;

    return Ok(());
}

async fn upload_documents(
    backend: &BackendBox,
    tx: &mpsc::UnboundedSender<Event>,
    files: Vec<path::PathBuf>,
    save_to_azure: bool,
) -> Result<()> {
    let session_id = Config::get(ConfigKey::SessionID);
    let res = backend
        .upload_documents(&files, save_to_azure, &session_id)
        .await;

    let succeeded = match &res {
        Ok(outcome) => outcome.is_success(),
        Err(_) => false,
    };

    tx.send(Event::UploadCompleted(res))?;

    // Only a successful banner clears itself. A second upload before the
    // timer fires schedules an independent expiry; the pending one is not
    // cancelled.
    if succeeded {
        let expire_tx = tx.clone();
        tokio::spawn(async move {
            time::sleep(UPLOAD_STATUS_TTL).await;
            return expire_tx.send(Event::UploadStatusExpired());
        });
    }

    return Ok(());
}

pub struct ActionsService {}

impl ActionsService {
    pub async fn start(
        backend: BackendBox,
        tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        let backend = Arc::new(backend);

        loop {
            let action = rx.recv().await;
            if action.is_none() {
                return Ok(());
            }

            let worker_tx = tx.clone();
            let worker_backend = Arc::clone(&backend);
            match action.unwrap() {
                Action::StartSession() => {
                    tokio::spawn(async move {
                        return start_session(&worker_backend, &worker_tx).await;
                    });
                }
                Action::FetchChatHistory(mode) => {
                    tokio::spawn(async move {
                        return fetch_chat_history(&worker_backend, &worker_tx, mode).await;
                    });
                }
                Action::FetchAzureFiles() => {
                    tokio::spawn(async move {
                        return fetch_azure_files(&worker_backend, &worker_tx).await;
                    });
                }
                Action::Query(mode, question) => {
                    tokio::spawn(async move {
                        return query(&worker_backend, &worker_tx, mode, question).await;
                    });
                }
                Action::ClearChat(mode) => {
                    tokio::spawn(async move {
                        return clear_chat(&worker_backend, &worker_tx, mode).await;
                    });
                }
                Action::UploadDocuments(files, save_to_azure) => {
                    tokio::spawn(async move {
                        return upload_documents(&worker_backend, &worker_tx, files, save_to_azure)
                            .await;
                    });
                }
            }
        }
    }
}
