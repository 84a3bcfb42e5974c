use anyhow::Result;
use tui_textarea::Input;

use super::AzureFilesOutcome;
use super::ChatMode;
use super::ClearOutcome;
use super::QueryOutcome;
use super::UploadOutcome;

pub enum Event {
    AzureFilesLoaded(Result<AzureFilesOutcome>),
    ChatCleared(ChatMode, Result<ClearOutcome>),
    ChatHistoryLoaded(ChatMode, Result<QueryOutcome>),
    KeyboardCharInput(Input),
    KeyboardCTRLC(),
    KeyboardEnter(),
    KeyboardPaste(String),
    KeyboardTab(),
    QueryCompleted(ChatMode, Result<QueryOutcome>),
    SessionReady(String),
    UIResize(),
    UIScrollDown(),
    UIScrollPageDown(),
    UIScrollPageUp(),
    UIScrollUp(),
    UITick(),
    UploadCompleted(Result<UploadOutcome>),
    UploadStatusExpired(),
}
