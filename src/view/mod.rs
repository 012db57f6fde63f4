pub mod events;
pub mod input;
pub mod render;
pub mod state;
pub mod tui;

pub use events::{event_source_from_env, pump_events};
pub use state::{Submission, ViewState};
pub use tui::{enter_terminal, leave_terminal, Tui};
