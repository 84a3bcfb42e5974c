use std::path;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time;

use super::ActionsService;
use crate::domain::models::Action;
use crate::domain::models::Author;
use crate::domain::models::AzureFilesOutcome;
use crate::domain::models::Backend;
use crate::domain::models::ChatMode;
use crate::domain::models::ClearOutcome;
use crate::domain::models::Event;
use crate::domain::models::Message;
use crate::domain::models::QueryOutcome;
use crate::domain::models::UploadOutcome;

struct StubBackend {
    fail_session: bool,
    upload_status: String,
}

impl Default for StubBackend {
    fn default() -> StubBackend {
        return StubBackend {
            fail_session: false,
            upload_status: "success".to_string(),
        };
    }
}

#[async_trait]
impl Backend for StubBackend {
    async fn start_session(&self) -> Result<String> {
        if self.fail_session {
            bail!("the service is down");
        }

        return Ok("sess-123".to_string());
    }

    async fn upload_documents(
        &self,
        files: &[path::PathBuf],
        _save_to_azure: bool,
        _session_id: &str,
    ) -> Result<UploadOutcome> {
        return Ok(UploadOutcome {
            status: self.upload_status.to_string(),
            message: format!("{} files processed", files.len()),
        });
    }

    async fn query(
        &self,
        question: &str,
        _mode: ChatMode,
        _session_id: &str,
    ) -> Result<QueryOutcome> {
        return Ok(QueryOutcome {
            status: "success".to_string(),
            chat_history: vec![
                Message::new(Author::Assistant, "All clear."),
                Message::new(Author::User, question),
            ],
        });
    }

    async fn chat_history(&self, _mode: ChatMode) -> Result<QueryOutcome> {
        return Ok(QueryOutcome {
            status: "success".to_string(),
            chat_history: vec![],
        });
    }

    async fn azure_files(&self) -> Result<AzureFilesOutcome> {
        return Ok(AzureFilesOutcome {
            status: "success".to_string(),
            files_count: 2,
        });
    }

    async fn clear_chat(&self, _mode: ChatMode) -> Result<ClearOutcome> {
        return Ok(ClearOutcome {
            status: "success".to_string(),
        });
    }
}

fn start_service(
    backend: StubBackend,
) -> (mpsc::UnboundedSender<Action>, mpsc::UnboundedReceiver<Event>) {
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();

    tokio::spawn(async move {
        return ActionsService::start(Box::new(backend), event_tx, &mut action_rx).await;
    });

    return (action_tx, event_rx);
}

#[tokio::test]
async fn it_emits_session_ready_with_the_issued_id() -> Result<()> {
    let (tx, mut rx) = start_service(StubBackend::default());
    tx.send(Action::StartSession())?;

    match rx.recv().await.unwrap() {
        Event::SessionReady(session_id) => {
            assert_eq!(session_id, "sess-123");
        }
        _ => bail!("Wrong event from recv"),
    }

    return Ok(());
}

#[tokio::test]
async fn it_emits_nothing_when_the_session_request_fails() -> Result<()> {
    let (tx, mut rx) = start_service(StubBackend {
        fail_session: true,
        upload_status: "success".to_string(),
    });
    tx.send(Action::StartSession())?;
    tx.send(Action::FetchAzureFiles())?;

    // The failed session emits no event at all, so the next thing on the
    // channel is the azure listing.
    match rx.recv().await.unwrap() {
        Event::AzureFilesLoaded(res) => {
            assert_eq!(res.unwrap().files_count, 2);
        }
        _ => bail!("Wrong event from recv"),
    }

    return Ok(());
}

#[tokio::test]
async fn it_forwards_query_outcomes() -> Result<()> {
    let (tx, mut rx) = start_service(StubBackend::default());
    tx.send(Action::Query(
        ChatMode::Azure,
        "What does my MRI say?".to_string(),
    ))?;

    match rx.recv().await.unwrap() {
        Event::QueryCompleted(mode, res) => {
            assert_eq!(mode, ChatMode::Azure);
            let outcome = res.unwrap();
            assert!(outcome.is_success());
            assert_eq!(outcome.chat_history.len(), 2);
            assert_eq!(outcome.chat_history[1].text, "What does my MRI say?");
        }
        _ => bail!("Wrong event from recv"),
    }

    return Ok(());
}

#[tokio::test]
async fn it_forwards_history_and_clear_outcomes() -> Result<()> {
    let (tx, mut rx) = start_service(StubBackend::default());
    tx.send(Action::FetchChatHistory(ChatMode::Upload))?;

    match rx.recv().await.unwrap() {
        Event::ChatHistoryLoaded(mode, res) => {
            assert_eq!(mode, ChatMode::Upload);
            assert!(res.unwrap().is_success());
        }
        _ => bail!("Wrong event from recv"),
    }

    tx.send(Action::ClearChat(ChatMode::Upload))?;

    match rx.recv().await.unwrap() {
        Event::ChatCleared(mode, res) => {
            assert_eq!(mode, ChatMode::Upload);
            assert!(res.unwrap().is_success());
        }
        _ => bail!("Wrong event from recv"),
    }

    return Ok(());
}

#[tokio::test(start_paused = true)]
async fn it_expires_the_upload_banner_after_the_delay() -> Result<()> {
    let (tx, mut rx) = start_service(StubBackend::default());
    tx.send(Action::UploadDocuments(
        vec![path::PathBuf::from("scans.pdf")],
        false,
    ))?;

    match rx.recv().await.unwrap() {
        Event::UploadCompleted(res) => {
            assert!(res.unwrap().is_success());
        }
        _ => bail!("Wrong event from recv"),
    }

    match rx.recv().await.unwrap() {
        Event::UploadStatusExpired() => {}
        _ => bail!("Wrong event from recv"),
    }

    drop(tx);
    return Ok(());
}

#[tokio::test(start_paused = true)]
async fn it_does_not_schedule_expiry_for_rejected_uploads() -> Result<()> {
    let (tx, mut rx) = start_service(StubBackend {
        fail_session: false,
        upload_status: "error".to_string(),
    });
    tx.send(Action::UploadDocuments(
        vec![path::PathBuf::from("scans.pdf")],
        true,
    ))?;

    match rx.recv().await.unwrap() {
        Event::UploadCompleted(res) => {
            assert!(!res.unwrap().is_success());
        }
        _ => bail!("Wrong event from recv"),
    }

    let timed_out = time::timeout(time::Duration::from_secs(30), rx.recv()).await;
    assert!(timed_out.is_err());

    drop(tx);
    return Ok(());
}
