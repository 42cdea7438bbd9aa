//! File I/O for saving and loading solved dates.
//!
//! `solutions.json` is a single JSON object mapping `YYYY-MM-DD` date
//! keys to assignments, each an array of `{id, gx, gy, rotation}`
//! entries. The shape matches what the original web version of the
//! puzzle stored, so the format must stay stable.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::pieces::PlacedPiece;

/// Default solution store, written to the working directory.
pub const SOLUTIONS_FILE: &str = "solutions.json";

/// All saved solutions, keyed by date.
///
/// A `BTreeMap` keeps the file sorted by date, so diffs stay readable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SolutionBook {
    entries: BTreeMap<String, Vec<PlacedPiece>>,
}

impl SolutionBook {
    /// Loads the book, treating a missing file as an empty one.
    pub fn load(path: &Path) -> io::Result<Self> {
        match fs::read_to_string(path) {
            Ok(text) => serde_json::from_str(&text)
                .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err),
        }
    }

    /// Writes the book as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let text = serde_json::to_string_pretty(self)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        fs::write(path, text)
    }

    /// The saved solution for a date key, if any.
    pub fn get(&self, date_key: &str) -> Option<&[PlacedPiece]> {
        self.entries.get(date_key).map(Vec::as_slice)
    }

    /// Stores a solution, replacing any previous one for the date.
    pub fn insert(&mut self, date_key: String, solution: Vec<PlacedPiece>) {
        self.entries.insert(date_key, solution);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
