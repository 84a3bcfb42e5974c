use std::io::Write;
use std::path;

use anyhow::Result;

use super::ApiClient;
use crate::domain::models::Author;
use crate::domain::models::Backend;
use crate::domain::models::ChatMode;

impl ApiClient {
    fn with_url(url: String) -> ApiClient {
        return ApiClient { url };
    }
}

#[tokio::test]
async fn it_starts_a_session() -> Result<()> {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/start-session")
        .with_status(200)
        .with_body(r#"{"session_id": "sess-123"}"#)
        .create();

    let client = ApiClient::with_url(server.url());
    let session_id = client.start_session().await?;

    assert_eq!(session_id, "sess-123");
    mock.assert();

    return Ok(());
}

#[tokio::test]
async fn it_fails_to_start_a_session_on_server_errors() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/start-session")
        .with_status(500)
        .create();

    let client = ApiClient::with_url(server.url());
    let res = client.start_session().await;

    assert!(res.is_err());
    mock.assert();
}

#[tokio::test]
async fn it_sends_a_query_and_parses_the_returned_history() -> Result<()> {
    let body = r#"{
        "status": "success",
        "chat_history": [
            {"role": "assistant", "content": "Your cholesterol is within range.", "timestamp": "10:04:31"},
            {"role": "user", "content": "What does my bloodwork say?", "timestamp": "10:04:28"}
        ]
    }"#;

    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/query")
        .with_status(200)
        .with_body(body)
        .create();

    let client = ApiClient::with_url(server.url());
    let outcome = client
        .query("What does my bloodwork say?", ChatMode::Upload, "sess-123")
        .await?;

    assert!(outcome.is_success());
    assert_eq!(outcome.chat_history.len(), 2);
    assert_eq!(outcome.chat_history[0].author, Author::Assistant);
    assert_eq!(
        outcome.chat_history[0].text,
        "Your cholesterol is within range."
    );
    assert_eq!(outcome.chat_history[1].author, Author::User);
    mock.assert();

    return Ok(());
}

#[tokio::test]
async fn it_passes_non_success_statuses_through_to_the_caller() -> Result<()> {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/query")
        .with_status(200)
        .with_body(r#"{"status": "error", "chat_history": []}"#)
        .create();

    let client = ApiClient::with_url(server.url());
    let outcome = client
        .query("What does my bloodwork say?", ChatMode::Upload, "sess-123")
        .await?;

    assert!(!outcome.is_success());
    mock.assert();

    return Ok(());
}

#[tokio::test]
async fn it_fails_queries_on_server_errors() {
    let mut server = mockito::Server::new();
    let mock = server.mock("POST", "/api/query").with_status(502).create();

    let client = ApiClient::with_url(server.url());
    let res = client
        .query("What does my bloodwork say?", ChatMode::Upload, "sess-123")
        .await;

    assert!(res.is_err());
    mock.assert();
}

#[tokio::test]
async fn it_fetches_the_chat_history_for_a_mode() -> Result<()> {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/api/chat-history?mode=azure")
        .with_status(200)
        .with_body(r#"{"status": "success", "chat_history": []}"#)
        .create();

    let client = ApiClient::with_url(server.url());
    let outcome = client.chat_history(ChatMode::Azure).await?;

    assert!(outcome.is_success());
    assert!(outcome.chat_history.is_empty());
    mock.assert();

    return Ok(());
}

#[tokio::test]
async fn it_fails_history_fetches_on_server_errors() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/api/chat-history?mode=upload")
        .with_status(500)
        .create();

    let client = ApiClient::with_url(server.url());
    let res = client.chat_history(ChatMode::Upload).await;

    assert!(res.is_err());
    mock.assert();
}

#[tokio::test]
async fn it_counts_azure_files() -> Result<()> {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/api/azure-files")
        .with_status(200)
        .with_body(r#"{"status": "success", "files_count": 7}"#)
        .create();

    let client = ApiClient::with_url(server.url());
    let outcome = client.azure_files().await?;

    assert!(outcome.is_success());
    assert_eq!(outcome.files_count, 7);
    mock.assert();

    return Ok(());
}

#[tokio::test]
async fn it_clears_the_chat_for_a_mode() -> Result<()> {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/clear-chat")
        .with_status(200)
        .with_body(r#"{"status": "success"}"#)
        .create();

    let client = ApiClient::with_url(server.url());
    let outcome = client.clear_chat(ChatMode::Upload).await?;

    assert!(outcome.is_success());
    mock.assert();

    return Ok(());
}

#[tokio::test]
async fn it_fails_clears_on_server_errors() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/clear-chat")
        .with_status(500)
        .create();

    let client = ApiClient::with_url(server.url());
    let res = client.clear_chat(ChatMode::Azure).await;

    assert!(res.is_err());
    mock.assert();
}

#[tokio::test]
async fn it_uploads_documents_as_multipart() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let file_path = dir.path().join("scans.pdf");
    let mut file = std::fs::File::create(&file_path)?;
    file.write_all(b"%PDF-1.4 fixture")?;

    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/upload")
        .with_status(200)
        .with_body(r#"{"status": "success", "message": "1 files processed"}"#)
        .create();

    let client = ApiClient::with_url(server.url());
    let outcome = client
        .upload_documents(&[file_path], true, "sess-123")
        .await?;

    assert!(outcome.is_success());
    assert_eq!(outcome.message, "1 files processed");
    mock.assert();

    return Ok(());
}

#[tokio::test]
async fn it_fails_uploads_on_server_errors() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let file_path = dir.path().join("scans.pdf");
    let mut file = std::fs::File::create(&file_path)?;
    file.write_all(b"%PDF-1.4 fixture")?;

    let mut server = mockito::Server::new();
    let mock = server.mock("POST", "/api/upload").with_status(500).create();

    let client = ApiClient::with_url(server.url());
    let res = client
        .upload_documents(&[file_path], false, "sess-123")
        .await;

    assert!(res.is_err());
    mock.assert();

    return Ok(());
}

#[tokio::test]
async fn it_fails_uploads_when_a_file_is_unreadable() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/upload")
        .with_status(200)
        .expect(0)
        .create();

    let client = ApiClient::with_url(server.url());
    let res = client
        .upload_documents(
            &[path::PathBuf::from("/definitely/not/here.pdf")],
            false,
            "sess-123",
        )
        .await;

    assert!(res.is_err());
    mock.assert();
}
