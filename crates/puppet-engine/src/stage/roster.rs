// stage/roster.rs
//
// The active character set: attribute records edited through JSON forms,
// a selection cursor, and ranks recomputed on every mutation. Validation
// failures stay local, already-rendered characters are never affected by
// a rejected edit.

use serde::{Deserialize, Serialize};

use crate::api::types::{Color, ColorParseError};
use crate::layout::position::Position;
use crate::stage::ranking::competition_ranks;

/// Editable attributes of one character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterRecord {
    pub name: String,
    #[serde(default = "default_body")]
    pub body: Color,
    #[serde(default = "default_face")]
    pub face: Color,
    #[serde(default = "default_score")]
    pub score: i32,
    /// Stage mark; new characters line up along the lower band.
    #[serde(default = "default_position")]
    pub position: Position,
}

fn default_body() -> Color {
    Color::BODY_DEFAULT
}

fn default_face() -> Color {
    Color::FACE_DEFAULT
}

fn default_score() -> i32 {
    50
}

fn default_position() -> Position {
    Position::Percentage { x: 50.0, y: 70.0 }
}

impl Default for CharacterRecord {
    fn default() -> Self {
        Self {
            name: String::new(),
            body: Color::BODY_DEFAULT,
            face: Color::FACE_DEFAULT,
            score: 50,
            position: default_position(),
        }
    }
}

/// What can go wrong editing the roster. Everything here surfaces as a
/// local validation message, nothing is fatal.
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("malformed character record: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Color(#[from] ColorParseError),
    #[error("character index {index} out of range ({len} characters)")]
    OutOfRange { index: usize, len: usize },
    #[error("the last character cannot be removed")]
    LastCharacter,
}

/// The character store. Ranks are recomputed after every mutation so the
/// cast's pose logic (rank 1 salutes) always sees current standings.
#[derive(Debug, Default)]
pub struct Roster {
    characters: Vec<CharacterRecord>,
    ranks: Vec<u32>,
    selected: usize,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    fn rerank(&mut self) {
        let scores: Vec<i32> = self.characters.iter().map(|c| c.score).collect();
        self.ranks = competition_ranks(&scores);
    }

    /// Add a record and select it. Returns the new index.
    pub fn add(&mut self, record: CharacterRecord) -> usize {
        self.characters.push(record);
        self.selected = self.characters.len() - 1;
        self.rerank();
        self.selected
    }

    /// Add a record parsed from form JSON.
    pub fn add_json(&mut self, json: &str) -> Result<usize, RosterError> {
        let record: CharacterRecord = serde_json::from_str(json)?;
        Ok(self.add(record))
    }

    /// Replace the record at `index`.
    pub fn update(&mut self, index: usize, record: CharacterRecord) -> Result<(), RosterError> {
        let len = self.characters.len();
        let slot = self
            .characters
            .get_mut(index)
            .ok_or(RosterError::OutOfRange { index, len })?;
        *slot = record;
        self.rerank();
        Ok(())
    }

    /// Replace the record at `index` from form JSON. A parse failure
    /// leaves the existing record untouched.
    pub fn update_json(&mut self, index: usize, json: &str) -> Result<(), RosterError> {
        let record: CharacterRecord = serde_json::from_str(json)?;
        self.update(index, record)
    }

    /// Remove the record at `index`. Refuses to empty the roster, and
    /// keeps the selection pointing at a live record.
    pub fn remove(&mut self, index: usize) -> Result<CharacterRecord, RosterError> {
        let len = self.characters.len();
        if index >= len {
            return Err(RosterError::OutOfRange { index, len });
        }
        if len <= 1 {
            return Err(RosterError::LastCharacter);
        }

        let removed = self.characters.remove(index);
        if self.selected >= index && self.selected > 0 {
            self.selected -= 1;
        }
        self.selected = self.selected.min(self.characters.len() - 1);
        self.rerank();
        Ok(removed)
    }

    pub fn select(&mut self, index: usize) -> Result<(), RosterError> {
        if index >= self.characters.len() {
            return Err(RosterError::OutOfRange {
                index,
                len: self.characters.len(),
            });
        }
        self.selected = index;
        Ok(())
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn get(&self, index: usize) -> Option<&CharacterRecord> {
        self.characters.get(index)
    }

    /// Rank of the character at `index`, 1-based.
    pub fn rank_of(&self, index: usize) -> Option<u32> {
        self.ranks.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CharacterRecord, u32)> {
        self.characters.iter().zip(self.ranks.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    pub fn reset(&mut self) {
        self.characters.clear();
        self.ranks.clear();
        self.selected = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, score: i32) -> CharacterRecord {
        CharacterRecord {
            name: name.to_string(),
            score,
            ..CharacterRecord::default()
        }
    }

    #[test]
    fn add_selects_the_new_record_and_reranks() {
        let mut roster = Roster::new();
        roster.add(record("a", 85));
        roster.add(record("b", 97));
        assert_eq!(roster.selected(), 1);
        assert_eq!(roster.rank_of(0), Some(2));
        assert_eq!(roster.rank_of(1), Some(1));
    }

    #[test]
    fn ranks_follow_spec_example() {
        let mut roster = Roster::new();
        for (name, score) in [("a", 85), ("b", 23), ("c", 97), ("d", 41), ("e", 60)] {
            roster.add(record(name, score));
        }
        let ranks: Vec<u32> = roster.iter().map(|(_, r)| r).collect();
        assert_eq!(ranks, vec![2, 5, 1, 4, 3]);
    }

    #[test]
    fn remove_guards_the_last_record() {
        let mut roster = Roster::new();
        roster.add(record("only", 10));
        assert!(matches!(roster.remove(0), Err(RosterError::LastCharacter)));
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn remove_fixes_the_selection() {
        let mut roster = Roster::new();
        roster.add(record("a", 1));
        roster.add(record("b", 2));
        roster.add(record("c", 3));
        roster.select(2).unwrap();

        roster.remove(2).unwrap();
        assert_eq!(roster.selected(), 1);

        roster.remove(0).unwrap();
        assert_eq!(roster.selected(), 0);
        assert_eq!(roster.get(0).unwrap().name, "b");
    }

    #[test]
    fn add_json_applies_color_defaults() {
        let mut roster = Roster::new();
        let idx = roster.add_json(r#"{"name": "Nim", "score": 72}"#).unwrap();
        let rec = roster.get(idx).unwrap();
        assert_eq!(rec.body, Color::BODY_DEFAULT);
        assert_eq!(rec.face, Color::FACE_DEFAULT);
    }

    #[test]
    fn malformed_json_leaves_roster_untouched() {
        let mut roster = Roster::new();
        roster.add(record("keep", 50));
        let err = roster.update_json(0, r##"{"name": "x", "body": "#zzzzzz"}"##);
        assert!(err.is_err());
        assert_eq!(roster.get(0).unwrap().name, "keep");
    }

    #[test]
    fn record_round_trips_through_json() {
        let rec = CharacterRecord {
            name: "Mori".to_string(),
            body: Color(0x00ff00),
            face: Color(0xff0000),
            score: 88,
            position: Position::Percentage { x: 15.0, y: 70.0 },
        };
        let json = serde_json::to_string(&rec).unwrap();
        let back: CharacterRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rec);
    }
}
