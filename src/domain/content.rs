use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Highest chapter index in every mode/difficulty track
pub const MAX_CHAPTER: u8 = 10;

/// Game variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Assemble a word from syllables
    Words,
    /// Assemble a sentence from words
    Sentences,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Words, Mode::Sentences];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Words => "words",
            Mode::Sentences => "sentences",
        }
    }

    /// Separator placed between pieces when the solution is spelled out
    pub fn joiner(&self) -> &'static str {
        match self {
            Mode::Words => "",
            Mode::Sentences => " ",
        }
    }

    /// Text the drop zone emits for a piece.
    ///
    /// Sentence pieces after the first carry their own leading space, so the
    /// accumulated answer reads like the solution.
    pub fn emit_piece(&self, piece: &str, first: bool) -> String {
        if first {
            piece.to_string()
        } else {
            format!("{}{}", self.joiner(), piece)
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "words" => Ok(Mode::Words),
            "sentences" => Ok(Mode::Sentences),
            other => Err(format!("invalid game mode '{other}', use 'words' or 'sentences'")),
        }
    }
}

/// Difficulty track. `facil` and `dificil` are accepted as legacy spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[serde(alias = "facil")]
    Easy,
    Normal,
    #[serde(alias = "dificil")]
    Difficult,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Difficult];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Difficult => "difficult",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" | "facil" => Ok(Difficulty::Easy),
            "normal" => Ok(Difficulty::Normal),
            "difficult" | "dificil" => Ok(Difficulty::Difficult),
            other => Err(format!(
                "invalid difficulty '{other}', use 'easy', 'normal' or 'difficult'"
            )),
        }
    }
}

/// Chapter index, always within `1..=MAX_CHAPTER`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Chapter(u8);

impl Chapter {
    pub const FIRST: Chapter = Chapter(1);
    pub const LAST: Chapter = Chapter(MAX_CHAPTER);

    pub fn new(value: u8) -> Option<Self> {
        (1..=MAX_CHAPTER).contains(&value).then_some(Self(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// The chapter after this one, `None` once the track is exhausted
    pub fn next(self) -> Option<Chapter> {
        Chapter::new(self.0 + 1)
    }

    pub fn all() -> impl Iterator<Item = Chapter> {
        (1..=MAX_CHAPTER).map(Chapter)
    }
}

impl TryFrom<u8> for Chapter {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Chapter::new(value).ok_or_else(|| format!("chapter must be between 1 and {MAX_CHAPTER}"))
    }
}

impl From<Chapter> for u8 {
    fn from(chapter: Chapter) -> Self {
        chapter.0
    }
}

impl FromStr for Chapter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u8 = s
            .trim()
            .parse()
            .map_err(|_| format!("chapter must be between 1 and {MAX_CHAPTER}"))?;
        Chapter::try_from(value)
    }
}

impl std::fmt::Display for Chapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One puzzle as stored in the content catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleSpec {
    pub mode: Mode,
    pub difficulty: Difficulty,
    pub chapter: Chapter,
    pub solution: String,
    /// Syllables or words in solution order; shuffled only when rendered
    pub pieces: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
}

impl PuzzleSpec {
    /// Pieces joined in their original order
    pub fn spelled_out(&self) -> String {
        self.pieces.join(self.mode.joiner())
    }

    /// Check that the pieces rebuild the solution (case-insensitive).
    pub fn check_consistency(&self) -> Result<(), String> {
        if self.solution.is_empty() {
            return Err("solution is empty".to_string());
        }
        if self.pieces.is_empty() {
            return Err("pieces are empty".to_string());
        }
        let spelled = normalize(&self.spelled_out());
        let solution = normalize(&self.solution);
        if spelled != solution {
            return Err(format!(
                "pieces spell '{spelled}' but the solution is '{solution}'"
            ));
        }
        Ok(())
    }

    pub fn default_image_path(mode: Mode, difficulty: Difficulty, chapter: Chapter) -> String {
        format!("images/{mode}/{difficulty}/{chapter}.png")
    }

    pub fn default_audio_path(mode: Mode, difficulty: Difficulty, chapter: Chapter) -> String {
        format!("audio/{mode}/{difficulty}/{chapter}.mp3")
    }
}

/// Case normalization shared by the matcher and content checks
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn test_legacy_difficulty_spellings() {
        assert_eq!("facil".parse::<Difficulty>().unwrap(), Difficulty::Easy);
        assert_eq!("DIFICIL".parse::<Difficulty>().unwrap(), Difficulty::Difficult);
        let parsed: Difficulty = serde_json::from_str("\"facil\"").unwrap();
        assert_eq!(parsed, Difficulty::Easy);
        assert_eq!(serde_json::to_string(&Difficulty::Difficult).unwrap(), "\"difficult\"");
        assert!("hard".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_chapter_bounds() {
        assert!(Chapter::new(0).is_none());
        assert!(Chapter::new(11).is_none());
        assert_eq!(Chapter::new(9).and_then(Chapter::next), Chapter::new(10));
        assert_eq!(Chapter::LAST.next(), None);
        assert_eq!(Chapter::all().count(), 10);
        assert!(serde_json::from_str::<Chapter>("11").is_err());
        assert_eq!(" 4 ".parse::<Chapter>().unwrap().get(), 4);
    }

    #[test]
    fn test_consistency_words_and_sentences() {
        assert!(spec(Mode::Words, "CASA", &["ca", "sa"]).check_consistency().is_ok());
        assert!(
            spec(Mode::Sentences, "El perro corre", &["El", "perro", "corre"])
                .check_consistency()
                .is_ok()
        );
        assert!(spec(Mode::Words, "casa", &["sa", "ca"]).check_consistency().is_err());
        assert!(spec(Mode::Words, "casa", &[]).check_consistency().is_err());
        assert!(spec(Mode::Words, "", &["ca"]).check_consistency().is_err());
    }

    #[test]
    fn test_emit_piece_spacing() {
        assert_eq!(Mode::Words.emit_piece("sa", false), "sa");
        assert_eq!(Mode::Sentences.emit_piece("perro", true), "perro");
        assert_eq!(Mode::Sentences.emit_piece("perro", false), " perro");
    }
}
