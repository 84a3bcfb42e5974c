#[cfg(test)]
#[path = "bubble_test.rs"]
mod tests;

use ratatui::style::Color;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;

use crate::domain::models::Author;
use crate::domain::models::Message;
use crate::domain::models::MessageType;

// Left border + left padding + right padding + right border.
const BUBBLE_PADDING: usize = 4;
// Border elements plus the scrollbar column.
const BORDER_ELEMENTS_LENGTH: usize = 5;
// Minimum share of the window kept free beside a bubble.
const OUTER_PADDING_PERCENTAGE: f32 = 0.04;

#[derive(PartialEq, Eq)]
pub enum BubbleAlignment {
    Left,
    Right,
}

pub struct Bubble<'a> {
    alignment: BubbleAlignment,
    message: &'a Message,
    window_max_width: usize,
}

fn pad(count: usize) -> String {
    return " ".repeat(count);
}

impl<'a> Bubble<'a> {
    pub fn new(
        message: &'a Message,
        alignment: BubbleAlignment,
        window_max_width: usize,
    ) -> Bubble<'a> {
        return Bubble {
            alignment,
            message,
            window_max_width,
        };
    }

    pub fn as_lines(&self) -> Vec<Line<'static>> {
        let max_line_length = self.get_max_line_length();
        let style = self.style();
        let title = self.title();
        let title_length = title.chars().count();
        let outer_gap = self
            .window_max_width
            .saturating_sub(max_line_length + BUBBLE_PADDING);

        let mut lines: Vec<Line<'static>> = vec![];

        let top_fill = ["─"]
            .repeat((max_line_length + 2).saturating_sub(title_length))
            .join("");
        lines.push(self.align(Span::styled(format!("╭{title}{top_fill}╮"), style), outer_gap));

        for text_line in self.wrap_text(max_line_length) {
            let fill = pad(max_line_length.saturating_sub(text_line.chars().count()));
            lines.push(self.align(
                Span::styled(format!("│ {text_line}{fill} │"), style),
                outer_gap,
            ));
        }

        let bottom_bar = ["─"].repeat(max_line_length + 2).join("");
        lines.push(self.align(Span::styled(format!("╰{bottom_bar}╯"), style), outer_gap));

        return lines;
    }

    fn align(&self, span: Span<'static>, outer_gap: usize) -> Line<'static> {
        if self.alignment == BubbleAlignment::Left {
            return Line::from(vec![span, Span::from(pad(outer_gap))]);
        }

        return Line::from(vec![Span::from(pad(outer_gap)), span]);
    }

    fn title(&self) -> String {
        let author = self.message.author.to_string();
        if self.message.timestamp.is_empty() {
            return author;
        }

        return format!("{author} ({})", self.message.timestamp);
    }

    fn style(&self) -> Style {
        if self.message.message_type() == MessageType::Error {
            return Style::default().fg(Color::Red);
        }
        if self.message.author == Author::User {
            return Style::default().fg(Color::Blue);
        }

        return Style::default();
    }

    fn get_max_line_length(&self) -> usize {
        let min_bubble_padding_length =
            ((self.window_max_width as f32) * OUTER_PADDING_PERCENTAGE).ceil() as usize;
        let line_border_width = BORDER_ELEMENTS_LENGTH + min_bubble_padding_length;

        let mut max_line_length = self
            .message
            .text
            .lines()
            .map(|line| {
                return line.chars().count();
            })
            .max()
            .unwrap_or(0);

        let width_limit = self.window_max_width.saturating_sub(line_border_width);
        if max_line_length > width_limit {
            max_line_length = width_limit;
        }

        let title_length = self.title().chars().count();
        if max_line_length < title_length {
            max_line_length = title_length;
        }

        return max_line_length;
    }

    fn wrap_text(&self, max_line_length: usize) -> Vec<String> {
        let mut wrapped: Vec<String> = vec![];

        for full_line in self.message.text.split('\n') {
            if full_line.trim().is_empty() {
                wrapped.push(" ".to_string());
                continue;
            }

            let mut char_count = 0;
            let mut current_words: Vec<&str> = vec![];

            for word in full_line.split(' ') {
                let word_length = word.chars().count();
                if word_length + char_count + 1 > max_line_length && !current_words.is_empty() {
                    wrapped.push(current_words.join(" ").trim_end().to_string());
                    current_words = vec![word];
                    char_count = word_length + 1;
                } else {
                    current_words.push(word);
                    char_count += word_length + 1;
                }
            }

            if !current_words.is_empty() {
                wrapped.push(current_words.join(" ").trim_end().to_string());
            }
        }

        return wrapped;
    }
}
