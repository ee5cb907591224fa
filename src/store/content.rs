//! Puzzle catalog: lookup and seeding

use rusqlite::{params, OptionalExtension};
use serde::Deserialize;
use tracing::{info, warn};

use super::db::GameDb;
use super::{ContentStore, StoreError};
use crate::domain::{Chapter, Difficulty, Mode, PuzzleSpec};

/// Built-in content used by `letrasgo seed` when no file is given
pub const SAMPLE_CONTENT: &str = include_str!("../../data/sample_content.json");

/// One puzzle as written in a seed file.
///
/// Accepts the field spellings of older content dumps: the solution may be
/// given as `solution`, `word`, `sentence` or `text`, and the pieces as
/// `pieces`, `syllables` or `words`. Sentence pieces default to the solution
/// split on whitespace, word pieces to the whole word.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentEntry {
    pub mode: Mode,
    pub difficulty: Difficulty,
    pub chapter: Chapter,
    #[serde(alias = "word", alias = "sentence", alias = "text")]
    pub solution: String,
    #[serde(default, alias = "syllables", alias = "words")]
    pub pieces: Option<Vec<String>>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub audio: Option<String>,
}

impl ContentEntry {
    pub fn into_spec(self) -> PuzzleSpec {
        let pieces = self.pieces.unwrap_or_else(|| match self.mode {
            Mode::Words => vec![self.solution.clone()],
            Mode::Sentences => self.solution.split_whitespace().map(str::to_string).collect(),
        });
        PuzzleSpec {
            image: self.image.or_else(|| {
                Some(PuzzleSpec::default_image_path(self.mode, self.difficulty, self.chapter))
            }),
            audio: self.audio.or_else(|| {
                Some(PuzzleSpec::default_audio_path(self.mode, self.difficulty, self.chapter))
            }),
            mode: self.mode,
            difficulty: self.difficulty,
            chapter: self.chapter,
            solution: self.solution,
            pieces,
        }
    }
}

/// Outcome of a seeding run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub stored: usize,
    /// (position in the input, reason)
    pub skipped: Vec<(usize, String)>,
}

#[derive(Clone)]
pub struct ContentCatalog {
    db: GameDb,
}

impl ContentCatalog {
    pub fn new(db: GameDb) -> Self {
        Self { db }
    }

    /// Insert or replace a puzzle
    pub fn upsert(&self, spec: &PuzzleSpec) -> Result<(), StoreError> {
        let pieces = serde_json::to_string(&spec.pieces)?;
        let conn = self.db.conn()?;
        conn.execute(
            r#"INSERT OR REPLACE INTO puzzles
               (mode, difficulty, chapter, solution, pieces, image, audio)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"#,
            params![
                spec.mode.as_str(),
                spec.difficulty.as_str(),
                spec.chapter.get(),
                spec.solution,
                pieces,
                spec.image,
                spec.audio,
            ],
        )?;
        Ok(())
    }

    /// Store every consistent entry; inconsistent ones are reported and skipped.
    pub fn seed(&self, entries: Vec<ContentEntry>) -> Result<SeedReport, StoreError> {
        let mut report = SeedReport::default();
        for (index, entry) in entries.into_iter().enumerate() {
            let spec = entry.into_spec();
            if let Err(reason) = spec.check_consistency() {
                warn!(
                    "[letras:seed] Skipping {}/{}/{}: {}",
                    spec.mode, spec.difficulty, spec.chapter, reason
                );
                report.skipped.push((index, reason));
                continue;
            }
            self.upsert(&spec)?;
            report.stored += 1;
        }
        info!(
            "[letras:seed] Stored {} puzzles, skipped {}",
            report.stored,
            report.skipped.len()
        );
        Ok(report)
    }

    pub fn list(&self) -> Result<Vec<PuzzleSpec>, StoreError> {
        let conn = self.db.conn()?;
        let mut stmt = conn.prepare(
            r#"SELECT mode, difficulty, chapter, solution, pieces, image, audio
               FROM puzzles ORDER BY mode, difficulty, chapter"#,
        )?;
        let rows = stmt.query_map([], |r| {
            Ok(RawPuzzle {
                mode: r.get(0)?,
                difficulty: r.get(1)?,
                chapter: r.get(2)?,
                solution: r.get(3)?,
                pieces: r.get(4)?,
                image: r.get(5)?,
                audio: r.get(6)?,
            })
        })?;
        let mut specs = Vec::new();
        for row in rows {
            specs.push(row?.into_spec()?);
        }
        Ok(specs)
    }

    pub fn count(&self) -> Result<u64, StoreError> {
        let conn = self.db.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM puzzles", [], |r| r.get(0))?;
        Ok(count as u64)
    }
}

impl ContentStore for ContentCatalog {
    fn get(
        &self,
        mode: Mode,
        difficulty: Difficulty,
        chapter: Chapter,
    ) -> Result<Option<PuzzleSpec>, StoreError> {
        let conn = self.db.conn()?;
        let raw = conn
            .query_row(
                r#"SELECT mode, difficulty, chapter, solution, pieces, image, audio
                   FROM puzzles WHERE mode = ?1 AND difficulty = ?2 AND chapter = ?3"#,
                params![mode.as_str(), difficulty.as_str(), chapter.get()],
                |r| {
                    Ok(RawPuzzle {
                        mode: r.get(0)?,
                        difficulty: r.get(1)?,
                        chapter: r.get(2)?,
                        solution: r.get(3)?,
                        pieces: r.get(4)?,
                        image: r.get(5)?,
                        audio: r.get(6)?,
                    })
                },
            )
            .optional()?;
        raw.map(RawPuzzle::into_spec).transpose()
    }
}

struct RawPuzzle {
    mode: String,
    difficulty: String,
    chapter: u8,
    solution: String,
    pieces: String,
    image: Option<String>,
    audio: Option<String>,
}

impl RawPuzzle {
    fn into_spec(self) -> Result<PuzzleSpec, StoreError> {
        Ok(PuzzleSpec {
            mode: self.mode.parse().map_err(StoreError::Corrupt)?,
            difficulty: self.difficulty.parse().map_err(StoreError::Corrupt)?,
            chapter: Chapter::try_from(self.chapter).map_err(StoreError::Corrupt)?,
            solution: self.solution,
            pieces: serde_json::from_str(&self.pieces)?,
            image: self.image,
            audio: self.audio,
        })
    }
}

/// Parse a seed file (JSON array of entries)
pub fn parse_entries(json: &str) -> Result<Vec<ContentEntry>, serde_json::Error> {
    serde_json::from_str(json)
}
