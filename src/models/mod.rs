mod question;
mod state;

pub use question::{Choice, Choices, Question};
pub use state::AppState;
