//! One puzzle on screen: the shuffled board, the matcher and the presenter.

use rand::seq::SliceRandom;
use rand::Rng;

use super::feedback::{Feedback, Presenter, Sound};
use super::matcher::{Classification, PieceId, PuzzleError, PuzzleMatcher};
use crate::domain::PuzzleSpec;

pub struct PuzzleSession<'p> {
    spec: PuzzleSpec,
    matcher: PuzzleMatcher,
    /// Render order of the pieces
    layout: Vec<PieceId>,
    placed: usize,
    presenter: &'p dyn Presenter,
}

impl<'p> PuzzleSession<'p> {
    /// Start a puzzle with the pieces shown in random order.
    pub fn start<R: Rng + ?Sized>(
        spec: PuzzleSpec,
        presenter: &'p dyn Presenter,
        rng: &mut R,
    ) -> Result<Self, PuzzleError> {
        let mut session = Self::start_in_order(spec, presenter)?;
        session.layout.shuffle(rng);
        Ok(session)
    }

    /// Start a puzzle with the pieces shown in spec order.
    pub fn start_in_order(
        spec: PuzzleSpec,
        presenter: &'p dyn Presenter,
    ) -> Result<Self, PuzzleError> {
        let mut matcher = PuzzleMatcher::new();
        matcher.start(&spec)?;
        let layout = (0..spec.pieces.len()).collect();
        presenter.show_answer("");
        Ok(Self {
            spec,
            matcher,
            layout,
            placed: 0,
            presenter,
        })
    }

    pub fn spec(&self) -> &PuzzleSpec {
        &self.spec
    }

    /// Pieces still on the board, in render order
    pub fn board(&self) -> Vec<(PieceId, &str)> {
        self.layout
            .iter()
            .filter(|id| {
                self.matcher
                    .state()
                    .is_some_and(|state| !state.is_consumed(**id))
            })
            .map(|id| (*id, self.spec.pieces[*id].as_str()))
            .collect()
    }

    pub fn answer(&self) -> &str {
        self.matcher.state().map(|s| s.accumulated()).unwrap_or("")
    }

    pub fn pick_up(&self, _id: PieceId) {
        self.presenter.play_sound(Sound::Drag);
    }

    /// Drop a piece into the answer zone and report the verdict.
    pub fn drop_piece(&mut self, id: PieceId) -> Result<Classification, PuzzleError> {
        let text = self.matcher.place_piece(id)?.to_string();
        let emitted = self.spec.mode.emit_piece(&text, self.placed == 0);
        self.placed += 1;
        self.presenter.play_sound(Sound::Drop);

        let verdict = self.matcher.submit_piece(&emitted)?;
        self.presenter.show_answer(self.answer());
        match verdict {
            Classification::Correct => {
                self.presenter.play_sound(Sound::Win);
                self.presenter.show_feedback(Feedback::Congratulations);
            }
            Classification::Incorrect => {
                self.presenter.play_sound(Sound::Error);
                self.presenter.show_feedback(Feedback::TryAgain);
            }
            Classification::InProgress => {}
        }
        Ok(verdict)
    }

    /// Put every piece back on the board.
    pub fn retry(&mut self) {
        self.matcher.reset();
        self.placed = 0;
        self.presenter.show_answer("");
    }
}
