//! Screen flow of a game session as an explicit state machine.
//!
//! `transition` is pure: it takes the current context and an event and
//! returns the next context, leaving side effects (network, sound) to the
//! caller.

use thiserror::Error;

use super::feedback::{Presenter, Sound};
use crate::domain::{Chapter, Difficulty, Mode, Progress, UserProfile};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    ModeSelect,
    DifficultySelect {
        mode: Mode,
    },
    ChapterSelect {
        mode: Mode,
        difficulty: Difficulty,
    },
    Playing {
        mode: Mode,
        difficulty: Difficulty,
        chapter: Chapter,
    },
    /// Puzzle solved, waiting for the server to confirm progress
    Solved {
        mode: Mode,
        difficulty: Difficulty,
        chapter: Chapter,
    },
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::ModeSelect => "mode-select",
            Screen::DifficultySelect { .. } => "difficulty-select",
            Screen::ChapterSelect { .. } => "chapter-select",
            Screen::Playing { .. } => "playing",
            Screen::Solved { .. } => "solved",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowEvent {
    ChooseMode(Mode),
    ChooseDifficulty(Difficulty),
    ChooseChapter(Chapter),
    Back,
    /// The matcher reported `Correct`; score is credited locally right away
    PuzzleSolved { score_to_add: u64 },
    /// Server answer to the progress update
    ProgressSynced { score: u64, progress: Progress },
    /// Progress update failed; keep the local view and move on
    SyncFailed,
}

impl FlowEvent {
    /// Menu steps taken by the player, as opposed to game and sync results
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            FlowEvent::ChooseMode(_)
                | FlowEvent::ChooseDifficulty(_)
                | FlowEvent::ChooseChapter(_)
                | FlowEvent::Back
        )
    }

    fn name(&self) -> &'static str {
        match self {
            FlowEvent::ChooseMode(_) => "choose-mode",
            FlowEvent::ChooseDifficulty(_) => "choose-difficulty",
            FlowEvent::ChooseChapter(_) => "choose-chapter",
            FlowEvent::Back => "back",
            FlowEvent::PuzzleSolved { .. } => "puzzle-solved",
            FlowEvent::ProgressSynced { .. } => "progress-synced",
            FlowEvent::SyncFailed => "sync-failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    #[error("'{event}' is not allowed on the {screen} screen")]
    NotAllowed {
        screen: &'static str,
        event: &'static str,
    },

    #[error("chapter {chapter} is locked (unlocked up to {unlocked})")]
    ChapterLocked { chapter: Chapter, unlocked: Chapter },
}

/// What the client knows about the signed-in player
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerView {
    pub username: String,
    pub score: u64,
    pub progress: Progress,
}

impl From<UserProfile> for PlayerView {
    fn from(profile: UserProfile) -> Self {
        Self {
            username: profile.username,
            score: profile.score,
            progress: profile.progress,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameContext {
    pub player: PlayerView,
    pub screen: Screen,
}

impl GameContext {
    pub fn new(player: PlayerView) -> Self {
        Self {
            player,
            screen: Screen::ModeSelect,
        }
    }
}

pub fn transition(ctx: &GameContext, event: FlowEvent) -> Result<GameContext, FlowError> {
    let mut next = ctx.clone();
    next.screen = match (ctx.screen, event) {
        (Screen::ModeSelect, FlowEvent::ChooseMode(mode)) => Screen::DifficultySelect { mode },
        (Screen::DifficultySelect { mode }, FlowEvent::ChooseDifficulty(difficulty)) => {
            Screen::ChapterSelect { mode, difficulty }
        }
        (Screen::DifficultySelect { .. }, FlowEvent::Back) => Screen::ModeSelect,
        (Screen::ChapterSelect { mode, difficulty }, FlowEvent::ChooseChapter(chapter)) => {
            if !ctx.player.progress.is_unlocked(mode, difficulty, chapter) {
                return Err(FlowError::ChapterLocked {
                    chapter,
                    unlocked: ctx.player.progress.unlocked(mode, difficulty),
                });
            }
            Screen::Playing {
                mode,
                difficulty,
                chapter,
            }
        }
        (Screen::ChapterSelect { mode, .. }, FlowEvent::Back) => Screen::DifficultySelect { mode },
        (
            Screen::Playing {
                mode,
                difficulty,
                chapter,
            },
            FlowEvent::PuzzleSolved { score_to_add },
        ) => {
            next.player.score = next.player.score.saturating_add(score_to_add);
            Screen::Solved {
                mode,
                difficulty,
                chapter,
            }
        }
        (Screen::Playing { mode, difficulty, .. }, FlowEvent::Back) => {
            Screen::ChapterSelect { mode, difficulty }
        }
        (
            Screen::Solved {
                mode, difficulty, ..
            },
            FlowEvent::ProgressSynced { score, progress },
        ) => {
            next.player.score = score;
            next.player.progress = progress;
            Screen::ChapterSelect { mode, difficulty }
        }
        (Screen::Solved { mode, difficulty, .. }, FlowEvent::SyncFailed) => {
            Screen::ChapterSelect { mode, difficulty }
        }
        (screen, event) => {
            return Err(FlowError::NotAllowed {
                screen: screen.name(),
                event: event.name(),
            });
        }
    };
    Ok(next)
}

/// [`transition`] for input coming from the player. Accepted menu steps
/// play a click.
pub fn navigate(
    ctx: &GameContext,
    event: FlowEvent,
    presenter: &dyn Presenter,
) -> Result<GameContext, FlowError> {
    let click = event.is_navigation();
    let next = transition(ctx, event)?;
    if click {
        presenter.play_sound(Sound::Click);
    }
    Ok(next)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Locked,
    Open,
    /// Highest unlocked chapter
    Current,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChapterSlot {
    pub chapter: Chapter,
    pub state: SlotState,
}

/// Lock state of every chapter in a track, for the chapter picker.
pub fn chapter_grid(progress: &Progress, mode: Mode, difficulty: Difficulty) -> Vec<ChapterSlot> {
    let unlocked = progress.unlocked(mode, difficulty);
    Chapter::all()
        .map(|chapter| ChapterSlot {
            chapter,
            state: if chapter > unlocked {
                SlotState::Locked
            } else if chapter == unlocked {
                SlotState::Current
            } else {
                SlotState::Open
            },
        })
        .collect()
}
