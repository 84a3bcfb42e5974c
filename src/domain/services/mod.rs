pub mod actions;

mod app_state;
mod bubble;
mod bubble_list;
mod chat_surface;
mod events;
mod scroll;

pub use app_state::*;
pub use bubble::*;
pub use bubble_list::*;
pub use chat_surface::*;
pub use events::*;
pub use scroll::*;
