use ratatui::prelude::Backend;
use ratatui::prelude::Rect;
use ratatui::text::Line;
use ratatui::widgets::Block;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::Bubble;
use super::BubbleAlignment;
use crate::domain::models::Author;
use crate::domain::models::Message;

/// Pre-rendered bubble lines for one chat surface. Lists are replaced
/// wholesale whenever the server responds, so the lines are rebuilt on every
/// set rather than cached per message.
#[derive(Default)]
pub struct BubbleList {
    lines: Vec<Line<'static>>,
}

impl BubbleList {
    pub fn set_messages(&mut self, messages: &[Message], line_width: usize) {
        self.lines = messages
            .iter()
            .flat_map(|message| {
                let mut align = BubbleAlignment::Left;
                if message.author == Author::User {
                    align = BubbleAlignment::Right;
                }

                return Bubble::new(message, align, line_width).as_lines();
            })
            .collect();
    }

    pub fn len(&self) -> usize {
        return self.lines.len();
    }

    pub fn render<B: Backend>(&self, frame: &mut Frame<B>, rect: Rect, scroll: u16) {
        frame.render_widget(
            Paragraph::new(self.lines.to_owned())
                .block(Block::default())
                .scroll((scroll, 0)),
            rect,
        );
    }
}
