//! Challenge descriptors and the sources that supply them
//!
//! A grid receives an ordered list of challenges; position `i` in the list is
//! cell `i` on the board. Sources only produce the list, the grid decides
//! whether the count fits.

use std::fs;
use std::path::PathBuf;

use thiserror::Error;

/// Text shown on the free center cell
pub const FREE_SPACE_TEXT: &str = "Free Space";

/// One challenge shown on a bingo cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    pub id: String,
    pub text: String,
}

impl Challenge {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }

    /// Stand-in used when a source supplied fewer challenges than cells
    pub fn placeholder(index: usize) -> Self {
        Self::new(format!("Q{}", index + 1), format!("Challenge {}", index + 1))
    }

    /// Descriptor for the free center cell
    pub fn free() -> Self {
        Self::new("FREE", FREE_SPACE_TEXT)
    }
}

#[derive(Debug, Error)]
pub enum ChallengeError {
    #[error("Failed to read challenge file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Question list needs at least {needed} questions, got {found}")]
    TooFewQuestions { needed: usize, found: usize },
}

/// Supplies the ordered challenge list for a grid
pub trait ChallengeSource {
    /// Loads the challenges
    ///
    /// # Errors
    /// Returns an error when the underlying data cannot be read.
    fn load(&self) -> Result<Vec<Challenge>, ChallengeError>;
}

/// Challenge list stored as a `id,text` CSV file with a header row
#[derive(Debug, Clone)]
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ChallengeSource for CsvFileSource {
    fn load(&self) -> Result<Vec<Challenge>, ChallengeError> {
        let text = fs::read_to_string(&self.path).map_err(|source| ChallengeError::Io {
            path: self.path.clone(),
            source,
        })?;
        let challenges = parse_challenge_csv(&text);
        log::debug!("Loaded {} challenges from {}", challenges.len(), self.path.display());
        Ok(challenges)
    }
}

/// Plain question list file, laid out for one board size
#[derive(Debug, Clone)]
pub struct QuestionListSource {
    path: PathBuf,
    size: usize,
}

impl QuestionListSource {
    pub fn new(path: impl Into<PathBuf>, size: usize) -> Self {
        Self {
            path: path.into(),
            size,
        }
    }
}

impl ChallengeSource for QuestionListSource {
    fn load(&self) -> Result<Vec<Challenge>, ChallengeError> {
        let text = fs::read_to_string(&self.path).map_err(|source| ChallengeError::Io {
            path: self.path.clone(),
            source,
        })?;
        parse_question_list(&text, self.size)
    }
}

/// Parses challenge CSV text
///
/// The first line is a header and is skipped. Blank lines are ignored. Each
/// remaining row is split on commas outside double quotes; the first field is
/// the id and the second the text. Rows with fewer than two fields are
/// dropped.
pub fn parse_challenge_csv(text: &str) -> Vec<Challenge> {
    text.trim()
        .lines()
        .skip(1)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(parse_csv_row)
        .collect()
}

fn parse_csv_row(line: &str) -> Option<Challenge> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    fields.push(current.trim().to_string());

    let mut fields = fields.into_iter();
    match (fields.next(), fields.next()) {
        (Some(id), Some(text)) => Some(Challenge { id, text }),
        _ => None,
    }
}

/// Parses a plain question list, one question per line
///
/// Used when importing questions into the game editor. Double quotes are
/// stripped and blank lines skipped. For odd sizes the center cell is filled
/// with [`Challenge::free`] and does not consume a question. Extra questions
/// beyond the grid are ignored.
///
/// # Errors
/// [`ChallengeError::TooFewQuestions`] if the list cannot fill every
/// non-free cell.
pub fn parse_question_list(text: &str, size: usize) -> Result<Vec<Challenge>, ChallengeError> {
    let cell_count = size * size;
    let center = (size % 2 == 1).then_some(cell_count / 2);
    let needed = cell_count - usize::from(center.is_some());

    let questions: Vec<String> = text
        .lines()
        .map(|line| line.trim().replace('"', ""))
        .filter(|line| !line.is_empty())
        .collect();

    if questions.len() < needed {
        return Err(ChallengeError::TooFewQuestions {
            needed,
            found: questions.len(),
        });
    }

    let mut questions = questions.into_iter();
    let challenges = (0..cell_count)
        .map(|index| {
            if Some(index) == center {
                Challenge::free()
            } else {
                // Length was checked above
                let text = questions.next().unwrap_or_default();
                Challenge::new(format!("Q{}", index + 1), text)
            }
        })
        .collect();

    Ok(challenges)
}
