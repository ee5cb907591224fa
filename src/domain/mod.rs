//! Core domain types for LetrasGo

mod content;
mod progress;
mod user;

pub use content::{normalize, Chapter, Difficulty, Mode, PuzzleSpec, MAX_CHAPTER};
pub use progress::{apply_completion, Completion, Progress, ProgressRecord, MAX_SCORE};
pub use user::{UserAccount, UserId, UserProfile};
