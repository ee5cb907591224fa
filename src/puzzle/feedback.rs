//! Presentation capabilities injected into a puzzle session.

use std::cell::RefCell;

use tracing::debug;

/// Short sound effects the front end can play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sound {
    Click,
    Drag,
    Drop,
    Win,
    Error,
}

/// Banner shown over the board after a verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Congratulations,
    TryAgain,
}

impl Feedback {
    pub fn message(&self) -> &'static str {
        match self {
            Feedback::Congratulations => "Well done!",
            Feedback::TryAgain => "Try again!",
        }
    }
}

/// Whatever renders sounds and feedback for the player.
pub trait Presenter {
    fn play_sound(&self, sound: Sound);

    fn show_feedback(&self, feedback: Feedback);

    /// Called whenever the drop zone text changes
    fn show_answer(&self, _answer: &str) {}
}

/// Presenter that only traces calls; used headless and in tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentPresenter;

impl Presenter for SilentPresenter {
    fn play_sound(&self, sound: Sound) {
        debug!("[letras:feedback] sound {:?}", sound);
    }

    fn show_feedback(&self, feedback: Feedback) {
        debug!("[letras:feedback] {}", feedback.message());
    }
}

/// Presenter that records every call, for asserting on what the player saw.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    pub sounds: RefCell<Vec<Sound>>,
    pub feedback: RefCell<Vec<Feedback>>,
    pub answers: RefCell<Vec<String>>,
}

impl Presenter for RecordingPresenter {
    fn play_sound(&self, sound: Sound) {
        self.sounds.borrow_mut().push(sound);
    }

    fn show_feedback(&self, feedback: Feedback) {
        self.feedback.borrow_mut().push(feedback);
    }

    fn show_answer(&self, answer: &str) {
        self.answers.borrow_mut().push(answer.to_string());
    }
}

/// Presenter writing to the terminal, used by `letrasgo play`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPresenter {
    pub muted: bool,
}

impl Presenter for TerminalPresenter {
    fn play_sound(&self, sound: Sound) {
        if self.muted {
            return;
        }
        if matches!(sound, Sound::Win | Sound::Error) {
            // terminal bell
            eprint!("\x07");
        }
    }

    fn show_feedback(&self, feedback: Feedback) {
        println!("\n  *** {} ***\n", feedback.message());
    }

    fn show_answer(&self, answer: &str) {
        if answer.is_empty() {
            println!("  [ drop here ]");
        } else {
            println!("  [ {} ]", answer.to_uppercase());
        }
    }
}
