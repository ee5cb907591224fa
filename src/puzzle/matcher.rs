//! Puzzle assembly: turns a sequence of dropped pieces into a verdict.
//!
//! A wrong answer is only reported once the accumulated text is at least as
//! long as the target. A piece that diverges early keeps the attempt
//! `InProgress` until enough material has been placed.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::domain::{normalize, PuzzleSpec};

/// Index of a piece within `PuzzleSpec::pieces`
pub type PieceId = usize;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PuzzleError {
    #[error("invalid puzzle: {0}")]
    InvalidSpec(String),

    #[error("no puzzle has been started")]
    NotStarted,

    #[error("unknown piece #{0}")]
    UnknownPiece(PieceId),

    #[error("piece #{0} has already been placed")]
    PieceAlreadyPlaced(PieceId),
}

/// Verdict for the answer assembled so far
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    InProgress,
    Correct,
    Incorrect,
}

/// State of one attempt, owned by the matcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyState {
    accumulated: String,
    consumed: BTreeSet<PieceId>,
    target: String,
    pieces: Vec<String>,
}

impl AssemblyState {
    pub fn accumulated(&self) -> &str {
        &self.accumulated
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn is_consumed(&self, id: PieceId) -> bool {
        self.consumed.contains(&id)
    }

    /// Pieces still in the pool, in spec order
    pub fn available(&self) -> impl Iterator<Item = (PieceId, &str)> {
        self.pieces
            .iter()
            .enumerate()
            .filter(|(id, _)| !self.consumed.contains(id))
            .map(|(id, text)| (id, text.as_str()))
    }

    fn classify(&self) -> Classification {
        if self.accumulated == self.target {
            Classification::Correct
        } else if self.accumulated.chars().count() >= self.target.chars().count() {
            Classification::Incorrect
        } else {
            Classification::InProgress
        }
    }
}

#[derive(Debug, Default)]
pub struct PuzzleMatcher {
    state: Option<AssemblyState>,
}

impl PuzzleMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a new attempt, discarding any previous one.
    pub fn start(&mut self, spec: &PuzzleSpec) -> Result<(), PuzzleError> {
        if spec.pieces.is_empty() {
            return Err(PuzzleError::InvalidSpec("pieces are empty".to_string()));
        }
        if spec.solution.is_empty() {
            return Err(PuzzleError::InvalidSpec("solution is empty".to_string()));
        }
        self.state = Some(AssemblyState {
            accumulated: String::new(),
            consumed: BTreeSet::new(),
            target: normalize(&spec.solution),
            pieces: spec.pieces.clone(),
        });
        Ok(())
    }

    pub fn state(&self) -> Option<&AssemblyState> {
        self.state.as_ref()
    }

    pub fn is_started(&self) -> bool {
        self.state.is_some()
    }

    /// Remove a piece from the pool and hand back its text.
    pub fn place_piece(&mut self, id: PieceId) -> Result<&str, PuzzleError> {
        let state = self.state.as_mut().ok_or(PuzzleError::NotStarted)?;
        if id >= state.pieces.len() {
            return Err(PuzzleError::UnknownPiece(id));
        }
        if !state.consumed.insert(id) {
            return Err(PuzzleError::PieceAlreadyPlaced(id));
        }
        Ok(&state.pieces[id])
    }

    /// Append a piece's text to the answer and classify the result.
    pub fn submit_piece(&mut self, piece_text: &str) -> Result<Classification, PuzzleError> {
        let state = self.state.as_mut().ok_or(PuzzleError::NotStarted)?;
        state.accumulated.push_str(&normalize(piece_text));
        Ok(state.classify())
    }

    /// Clear the answer and put every piece back in the pool.
    pub fn reset(&mut self) {
        if let Some(state) = self.state.as_mut() {
            state.accumulated.clear();
            state.consumed.clear();
        }
    }

    /// Drop the attempt entirely (puzzle finished or player left)
    pub fn finish(&mut self) {
        self.state = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Chapter, Difficulty, Mode};

    fn spec(mode: Mode, solution: &str, pieces: &[&str]) -> PuzzleSpec {
        PuzzleSpec {
            mode,
            difficulty: Difficulty::Easy,
            chapter: Chapter::FIRST,
            solution: solution.to_string(),
            pieces: pieces.iter().map(|p| p.to_string()).collect(),
            image: None,
            audio: None,
        }
    }

    fn casa() -> PuzzleSpec {
        spec(Mode::Words, "casa", &["ca", "sa"])
    }

    #[test]
    fn test_start_rejects_empty_spec() {
        let mut matcher = PuzzleMatcher::new();
        assert!(matches!(
            matcher.start(&spec(Mode::Words, "casa", &[])),
            Err(PuzzleError::InvalidSpec(_))
        ));
        assert!(matches!(
            matcher.start(&spec(Mode::Words, "", &["ca"])),
            Err(PuzzleError::InvalidSpec(_))
        ));
        assert!(!matcher.is_started());
    }

    #[test]
    fn test_submit_before_start() {
        let mut matcher = PuzzleMatcher::new();
        assert_eq!(matcher.submit_piece("ca"), Err(PuzzleError::NotStarted));
        assert_eq!(matcher.place_piece(0), Err(PuzzleError::NotStarted));
    }

    #[test]
    fn test_correct_order_is_correct_on_last_piece() {
        let mut matcher = PuzzleMatcher::new();
        matcher.start(&casa()).unwrap();
        assert_eq!(matcher.submit_piece("ca").unwrap(), Classification::InProgress);
        assert_eq!(matcher.submit_piece("sa").unwrap(), Classification::Correct);
    }

    #[test]
    fn test_wrong_first_piece_is_not_flagged_early() {
        let mut matcher = PuzzleMatcher::new();
        matcher.start(&casa()).unwrap();
        assert_eq!(matcher.submit_piece("sa").unwrap(), Classification::InProgress);
        assert_eq!(matcher.state().unwrap().accumulated(), "sa");
        assert_eq!(matcher.submit_piece("ca").unwrap(), Classification::Incorrect);
    }

    #[test]
    fn test_case_is_normalized() {
        let mut matcher = PuzzleMatcher::new();
        matcher.start(&spec(Mode::Words, "CAMPANA", &["CAM", "PA", "NA"])).unwrap();
        assert_eq!(matcher.state().unwrap().target(), "campana");
        matcher.submit_piece("Cam").unwrap();
        matcher.submit_piece("pA").unwrap();
        assert_eq!(matcher.submit_piece("NA").unwrap(), Classification::Correct);
    }

    #[test]
    fn test_overshoot_is_incorrect() {
        let mut matcher = PuzzleMatcher::new();
        matcher.start(&spec(Mode::Words, "mesa", &["me", "sa"])).unwrap();
        assert_eq!(matcher.submit_piece("mesas").unwrap(), Classification::Incorrect);
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let mut matcher = PuzzleMatcher::new();
        matcher.start(&spec(Mode::Words, "león", &["le", "ón"])).unwrap();
        // "leó" is 3 chars (4 bytes) against a 4 char target
        assert_eq!(matcher.submit_piece("leó").unwrap(), Classification::InProgress);
    }

    #[test]
    fn test_sentence_pieces_carry_their_own_spacing() {
        let puzzle = spec(Mode::Sentences, "El perro corre", &["El", "perro", "corre"]);
        let mut matcher = PuzzleMatcher::new();
        matcher.start(&puzzle).unwrap();
        let mut last = Classification::InProgress;
        for (i, piece) in puzzle.pieces.iter().enumerate() {
            last = matcher.submit_piece(&puzzle.mode.emit_piece(piece, i == 0)).unwrap();
        }
        assert_eq!(last, Classification::Correct);
    }

    #[test]
    fn test_reset_then_replay_is_correct() {
        let mut matcher = PuzzleMatcher::new();
        matcher.start(&casa()).unwrap();
        matcher.place_piece(1).unwrap();
        matcher.submit_piece("sa").unwrap();
        matcher.reset();
        matcher.reset();
        let state = matcher.state().unwrap();
        assert_eq!(state.accumulated(), "");
        assert_eq!(state.available().count(), 2);

        assert_eq!(matcher.submit_piece("ca").unwrap(), Classification::InProgress);
        assert_eq!(matcher.submit_piece("sa").unwrap(), Classification::Correct);
    }

    #[test]
    fn test_place_piece_pool_rules() {
        let mut matcher = PuzzleMatcher::new();
        matcher.start(&casa()).unwrap();
        assert_eq!(matcher.place_piece(0).unwrap(), "ca");
        assert_eq!(matcher.place_piece(0), Err(PuzzleError::PieceAlreadyPlaced(0)));
        assert_eq!(matcher.place_piece(7), Err(PuzzleError::UnknownPiece(7)));
        let remaining: Vec<_> = matcher.state().unwrap().available().collect();
        assert_eq!(remaining, vec![(1, "sa")]);
    }

    #[test]
    fn test_start_discards_previous_attempt() {
        let mut matcher = PuzzleMatcher::new();
        matcher.start(&casa()).unwrap();
        matcher.submit_piece("ca").unwrap();
        matcher.start(&spec(Mode::Words, "gato", &["ga", "to"])).unwrap();
        assert_eq!(matcher.state().unwrap().accumulated(), "");
        assert_eq!(matcher.submit_piece("ga").unwrap(), Classification::InProgress);
        assert_eq!(matcher.submit_piece("to").unwrap(), Classification::Correct);
    }

    #[test]
    fn test_every_reachable_length_is_flagged() {
        // Any ordering whose length reaches the target but differs is Incorrect
        let puzzle = spec(Mode::Words, "mariposa", &["ma", "ri", "po", "sa"]);
        let orders: [[usize; 4]; 3] = [[1, 0, 2, 3], [3, 2, 1, 0], [0, 1, 3, 2]];
        for order in orders {
            let mut matcher = PuzzleMatcher::new();
            matcher.start(&puzzle).unwrap();
            let mut verdicts = Vec::new();
            for id in order {
                let text = matcher.place_piece(id).unwrap().to_string();
                verdicts.push(matcher.submit_piece(&text).unwrap());
            }
            assert_eq!(&verdicts[..3], &[Classification::InProgress; 3]);
            assert_eq!(verdicts[3], Classification::Incorrect);
        }
    }
}
