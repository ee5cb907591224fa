//! Client-side game logic: puzzle matching, screen flow and presentation hooks.

mod feedback;
mod flow;
mod matcher;
mod session;

pub use feedback::{
    Feedback, Presenter, RecordingPresenter, SilentPresenter, Sound, TerminalPresenter,
};
pub use flow::{
    chapter_grid, navigate, transition, ChapterSlot, FlowError, FlowEvent, GameContext,
    PlayerView, Screen, SlotState,
};
pub use matcher::{AssemblyState, Classification, PieceId, PuzzleError, PuzzleMatcher};
pub use session::PuzzleSession;
