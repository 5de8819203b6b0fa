//! High score leaderboard system
//!
//! One ranked list per game mode, top 10 each. Stored as plain text next to
//! the settings: a name line followed by a score line, best first.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::MAX_RANKS;
use crate::error::PersistError;
use crate::sim::level::Mode;

/// Table shown until someone beats it
const DEFAULT_TABLE: [(&str, i64); MAX_RANKS] = [
    ("Funny Boat", 2000),
    ("Hectigo", 1500),
    ("JDruid", 1000),
    ("Pekuja", 750),
    ("Pirate", 500),
    ("Shark", 400),
    ("Seagull", 300),
    ("Naval Mine", 200),
    ("Cannonball", 100),
    ("Puffy the Cloud", 50),
];

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    pub score: i64,
}

impl HighScoreEntry {
    pub fn new(name: impl Into<String>, score: i64) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

/// High score leaderboard for one mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScores {
    pub mode: Mode,
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Empty leaderboard
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            entries: Vec::new(),
        }
    }

    /// The built-in table
    pub fn defaults(mode: Mode) -> Self {
        Self {
            mode,
            entries: DEFAULT_TABLE
                .iter()
                .map(|&(name, score)| HighScoreEntry::new(name, score))
                .collect(),
        }
    }

    pub fn file_name(mode: Mode) -> &'static str {
        match mode {
            Mode::Story => "scores",
            Mode::Endless => "endless_scores",
        }
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            Mode::Story => "Story Mode",
            Mode::Endless => "Endless Mode",
        }
    }

    pub fn path(dir: &Path, mode: Mode) -> PathBuf {
        dir.join(Self::file_name(mode))
    }

    /// Parse name/score line pairs, keeping the best `MAX_RANKS`
    ///
    /// A trailing name without a score is ignored; a score that is not an
    /// integer makes the whole file unreadable.
    pub fn parse(mode: Mode, path: &Path, text: &str) -> Result<Self, PersistError> {
        let mut entries = Vec::new();
        let mut lines = text.lines().enumerate();
        while let (Some((_, name)), Some((n, score))) = (lines.next(), lines.next()) {
            let score = score
                .trim()
                .parse::<i64>()
                .map_err(|e| PersistError::parse(path, n + 1, format!("bad score: {e}")))?;
            entries.push(HighScoreEntry::new(name.trim(), score));
        }

        let mut scores = Self { mode, entries };
        scores.rank();
        Ok(scores)
    }

    /// Stable sort, best first, then cut to size
    fn rank(&mut self) {
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_RANKS);
    }

    pub fn to_file_string(&self) -> String {
        self.entries
            .iter()
            .map(|e| format!("{}\n{}\n", e.name, e.score))
            .collect()
    }

    pub fn read(dir: &Path, mode: Mode) -> Result<Self, PersistError> {
        let path = Self::path(dir, mode);
        let text = fs::read_to_string(&path).map_err(|e| PersistError::io(&path, e))?;
        Self::parse(mode, &path, &text)
    }

    /// Load the list for `mode`, falling back to the built-in table
    pub fn load(dir: &Path, mode: Mode) -> Self {
        match Self::read(dir, mode) {
            Ok(scores) => {
                log::info!(
                    "Loaded {} high scores from {}",
                    scores.entries.len(),
                    Self::path(dir, mode).display()
                );
                scores
            }
            Err(PersistError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                log::info!("No {:?} high scores yet, using the default table", mode);
                Self::defaults(mode)
            }
            Err(e) => {
                log::warn!("High scores unreadable, using the default table: {}", e);
                Self::defaults(mode)
            }
        }
    }

    pub fn save(&self, dir: &Path) -> Result<(), PersistError> {
        fs::create_dir_all(dir).map_err(|e| PersistError::io(dir, e))?;
        let path = Self::path(dir, self.mode);
        fs::write(&path, self.to_file_string()).map_err(|e| PersistError::io(&path, e))?;
        log::info!("High scores saved to {} ({} entries)", path.display(), self.entries.len());
        Ok(())
    }

    /// Check if a score qualifies for the leaderboard
    ///
    /// Negative scores never do; on a full list a tie with the lowest entry
    /// ranks below it and falls off.
    pub fn qualifies(&self, score: i64) -> bool {
        if score < 0 {
            return false;
        }
        if self.entries.len() < MAX_RANKS {
            return true;
        }
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: i64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a new score to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, name: &str, score: i64) -> Option<usize> {
        let rank = self.potential_rank(score)?;
        self.entries
            .insert(rank - 1, HighScoreEntry::new(name.trim(), score));
        self.entries.truncate(MAX_RANKS);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<i64> {
        self.entries.first().map(|e| e.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_missing_file_loads_default_table() {
        let dir = tempfile::tempdir().unwrap();
        let scores = HighScores::load(dir.path(), Mode::Story);
        assert_eq!(scores.entries.len(), MAX_RANKS);
        assert_eq!(scores.entries[0], HighScoreEntry::new("Funny Boat", 2000));
        assert_eq!(scores.entries[9], HighScoreEntry::new("Puffy the Cloud", 50));
    }

    #[test]
    fn test_modes_use_separate_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut endless = HighScores::new(Mode::Endless);
        endless.add_score("Pekuja", 42);
        endless.save(dir.path()).unwrap();

        assert!(dir.path().join("endless_scores").exists());
        assert!(!dir.path().join("scores").exists());
        assert_eq!(HighScores::load(dir.path(), Mode::Endless), endless);
        assert_eq!(HighScores::load(dir.path(), Mode::Story), HighScores::defaults(Mode::Story));
    }

    #[test]
    fn test_parse_sorts_and_trims() {
        let text = "  Low \n10\nHigh\n99\nMid\n50\nDangling";
        let scores = HighScores::parse(Mode::Story, Path::new("scores"), text).unwrap();
        let names: Vec<&str> = scores.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["High", "Mid", "Low"]);
    }

    #[test]
    fn test_corrupt_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("scores"), "Shark\nlots\n").unwrap();
        let err = HighScores::read(dir.path(), Mode::Story).unwrap_err();
        assert!(matches!(err, PersistError::Parse { line: 2, .. }));
        assert_eq!(HighScores::load(dir.path(), Mode::Story), HighScores::defaults(Mode::Story));
    }

    #[test]
    fn test_qualification_rules() {
        let scores = HighScores::defaults(Mode::Story);
        assert!(!scores.qualifies(-1));
        assert!(!scores.qualifies(50));
        assert!(scores.qualifies(51));
        assert_eq!(scores.potential_rank(2001), Some(1));
        assert!(HighScores::new(Mode::Story).qualifies(0));
    }

    #[test]
    fn test_ties_rank_after_existing_entries() {
        let mut scores = HighScores::defaults(Mode::Story);
        assert_eq!(scores.add_score("Newcomer", 1000), Some(4));
        assert_eq!(scores.entries[2].name, "JDruid");
        assert_eq!(scores.entries[3].name, "Newcomer");
        assert_eq!(scores.entries.len(), MAX_RANKS);
        assert_eq!(scores.entries[9].name, "Cannonball");
    }

    proptest! {
        #[test]
        fn prop_list_stays_sorted_and_bounded(
            adds in proptest::collection::vec(-100i64..5000, 0..40),
        ) {
            let mut scores = HighScores::new(Mode::Endless);
            for (i, score) in adds.into_iter().enumerate() {
                scores.add_score(&format!("p{i}"), score);
                prop_assert!(scores.entries.len() <= MAX_RANKS);
                prop_assert!(scores.entries.windows(2).all(|w| w[0].score >= w[1].score));
                prop_assert!(scores.entries.iter().all(|e| e.score >= 0));
            }
        }
    }
}
