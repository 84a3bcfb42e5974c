#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

use anyhow::Result;
use ratatui::prelude::Rect;

use super::BubbleList;
use super::ChatSurface;
use super::Scroll;
use crate::domain::models::Author;
use crate::domain::models::AzureFilesOutcome;
use crate::domain::models::ChatMode;
use crate::domain::models::ClearOutcome;
use crate::domain::models::Message;
use crate::domain::models::QueryOutcome;
use crate::domain::models::UploadOutcome;
use crate::domain::models::UploadStatus;

const UPLOAD_FALLBACK_ERROR_TEXT: &str = "An error occurred while uploading files";

/// One chat surface plus everything the terminal needs to draw it.
pub struct ChatPane {
    pub surface: ChatSurface,
    pub bubble_list: BubbleList,
    pub scroll: Scroll,
}

impl ChatPane {
    fn new(mode: ChatMode) -> ChatPane {
        return ChatPane {
            surface: ChatSurface::new(mode),
            bubble_list: BubbleList::default(),
            scroll: Scroll::default(),
        };
    }
}

/// Whole-app UI state. The two panes never share messages; the active mode
/// only selects which one is drawn and receives input.
pub struct AppState {
    pub active_mode: ChatMode,
    pub upload: ChatPane,
    pub azure: ChatPane,
    pub session_ready: bool,
    pub uploading: bool,
    pub upload_status: Option<UploadStatus>,
    pub azure_files_count: Option<u64>,
    pub last_known_width: u16,
    pub last_known_height: u16,
}

impl AppState {
    pub fn new(active_mode: ChatMode) -> AppState {
        return AppState {
            active_mode,
            upload: ChatPane::new(ChatMode::Upload),
            azure: ChatPane::new(ChatMode::Azure),
            session_ready: false,
            uploading: false,
            upload_status: None,
            azure_files_count: None,
            last_known_width: 0,
            last_known_height: 0,
        };
    }

    pub fn pane(&self, mode: ChatMode) -> &ChatPane {
        match mode {
            ChatMode::Upload => return &self.upload,
            ChatMode::Azure => return &self.azure,
        }
    }

    pub fn pane_mut(&mut self, mode: ChatMode) -> &mut ChatPane {
        match mode {
            ChatMode::Upload => return &mut self.upload,
            ChatMode::Azure => return &mut self.azure,
        }
    }

    pub fn active_pane(&self) -> &ChatPane {
        return self.pane(self.active_mode);
    }

    pub fn active_pane_mut(&mut self) -> &mut ChatPane {
        let mode = self.active_mode;
        return self.pane_mut(mode);
    }

    pub fn toggle_mode(&mut self) {
        self.active_mode = self.active_mode.toggle();
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.last_known_width = rect.width;
        self.last_known_height = rect.height;
        self.sync_pane(ChatMode::Upload);
        self.sync_pane(ChatMode::Azure);
    }

    /// Runs the optimistic-send guard for a surface. True means the message
    /// is now displayed and the caller should issue the query round trip.
    pub fn begin_send(&mut self, mode: ChatMode, text: &str) -> bool {
        let accepted = self.pane_mut(mode).surface.begin_send(text);
        if accepted {
            self.sync_pane(mode);
        }

        return accepted;
    }

    /// Prepends a Medichat-authored bubble to the active pane. Used for help
    /// output and command errors; superseded like any other local message
    /// the next time the server responds.
    pub fn add_app_message(&mut self, text: &str) {
        let mode = self.active_mode;
        self.pane_mut(mode)
            .surface
            .messages
            .insert(0, Message::new(Author::Medichat, text));
        self.sync_pane(mode);
    }

    pub fn handle_session_ready(&mut self, session_id: &str) {
        tracing::debug!(session_id = session_id, "session ready");
        self.session_ready = true;
    }

    pub fn handle_history_loaded(&mut self, mode: ChatMode, res: Result<QueryOutcome>) {
        self.pane_mut(mode).surface.apply_history(res);
        self.sync_pane(mode);
    }

    pub fn handle_query_completed(&mut self, mode: ChatMode, res: Result<QueryOutcome>) {
        self.pane_mut(mode).surface.apply_query_response(res);
        self.sync_pane(mode);
    }

    pub fn handle_chat_cleared(&mut self, mode: ChatMode, res: Result<ClearOutcome>) {
        self.pane_mut(mode).surface.apply_clear(res);
        self.sync_pane(mode);
    }

    pub fn handle_azure_files_loaded(&mut self, res: Result<AzureFilesOutcome>) {
        match res {
            Ok(outcome) => {
                if outcome.is_success() {
                    self.azure_files_count = Some(outcome.files_count);
                } else {
                    tracing::warn!(status = %outcome.status, "azure file listing rejected");
                }
            }
            Err(err) => {
                tracing::error!(error = ?err, "failed to list azure files");
            }
        }
    }

    pub fn handle_upload_completed(&mut self, res: Result<UploadOutcome>) {
        self.uploading = false;
        match res {
            Ok(outcome) => {
                self.upload_status = Some(UploadStatus {
                    success: outcome.is_success(),
                    message: outcome.message,
                });
            }
            Err(err) => {
                tracing::error!(error = ?err, "failed to upload documents");
                self.upload_status = Some(UploadStatus {
                    success: false,
                    message: UPLOAD_FALLBACK_ERROR_TEXT.to_string(),
                });
            }
        }
    }

    pub fn handle_upload_status_expired(&mut self) {
        self.upload_status = None;
    }

    pub fn azure_banner_text(&self) -> String {
        match self.azure_files_count {
            Some(0) => {
                return "0 documents stored in Azure. No documents available. Please upload in Local Chat."
                    .to_string();
            }
            Some(1) => return "1 document stored in Azure".to_string(),
            Some(count) => return format!("{count} documents stored in Azure"),
            None => return "Checking Azure storage...".to_string(),
        }
    }

    fn sync_pane(&mut self, mode: ChatMode) {
        let width = self.last_known_width as usize;
        let height = self.last_known_height;
        let pane = self.pane_mut(mode);
        pane.bubble_list.set_messages(&pane.surface.messages, width);
        pane.scroll
            .set_state(pane.bubble_list.len() as u16, height);
        pane.scroll.first();
    }
}
