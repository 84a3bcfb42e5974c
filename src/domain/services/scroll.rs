use ratatui::widgets::ScrollbarState;

const PAGE_SIZE: u16 = 10;

#[derive(Default)]
pub struct Scroll {
    max_position: u16,
    pub position: u16,
    pub scrollbar_state: ScrollbarState,
}

impl Scroll {
    pub fn up(&mut self) {
        self.position = self.position.saturating_sub(1);
        self.scrollbar_state.prev();
    }

    pub fn down(&mut self) {
        self.position = self.position.saturating_add(1).min(self.max_position);
        self.scrollbar_state.next();
    }

    pub fn up_page(&mut self) {
        for _ in 0..PAGE_SIZE {
            self.up();
        }
    }

    pub fn down_page(&mut self) {
        for _ in 0..PAGE_SIZE {
            self.down();
        }
    }

    /// Jumps to the newest content. Messages are kept newest first, so the
    /// top of the list is where fresh content lands.
    pub fn first(&mut self) {
        self.position = 0;
        self.scrollbar_state.first();
    }

    pub fn set_state(&mut self, list_length: u16, viewport_length: u16) {
        self.max_position = list_length.saturating_sub(viewport_length);
        self.position = self.position.min(self.max_position);
        self.scrollbar_state = self
            .scrollbar_state
            .content_length(list_length)
            .viewport_content_length(viewport_length);
    }
}
