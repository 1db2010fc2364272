//! In-memory match board.

use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::error::{MarketError, Result};

use super::filter::MatchFilter;
use super::types::Match;

/// Matches currently offered for betting, in display order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MatchBoard {
    matches: Vec<Match>,
}

impl MatchBoard {
    /// Create a board from a list of matches.
    pub fn new(matches: Vec<Match>) -> Self {
        Self { matches }
    }

    /// Load a board from a JSON array file. A missing file gives an empty board.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!(path = %path.display(), "No match file found, starting with an empty board");
            return Ok(Self::default());
        }

        let json = std::fs::read_to_string(path)?;
        let board = Self::from_json(&json)?;
        info!(path = %path.display(), matches = board.len(), "Match board loaded");
        Ok(board)
    }

    /// Parse a board from a JSON array.
    pub fn from_json(json: &str) -> std::result::Result<Self, MarketError> {
        let matches: Vec<Match> =
            serde_json::from_str(json).map_err(|e| MarketError::ParseError(e.to_string()))?;
        Ok(Self::new(matches))
    }

    /// All matches.
    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    /// Look up a match by id.
    pub fn find(&self, match_id: &str) -> Option<&Match> {
        self.matches.iter().find(|m| m.id == match_id)
    }

    /// Look up a match by id, failing when it is not listed.
    pub fn get(&self, match_id: &str) -> std::result::Result<&Match, MarketError> {
        self.find(match_id).ok_or_else(|| MarketError::UnknownMatch {
            match_id: match_id.to_string(),
        })
    }

    /// Matches passing the filter, in board order.
    pub fn filter(&self, filter: &MatchFilter) -> Vec<&Match> {
        self.matches.iter().filter(|m| filter.matches(m)).collect()
    }

    /// Distinct league names in board order.
    pub fn leagues(&self) -> Vec<&str> {
        let mut leagues: Vec<&str> = Vec::new();
        for m in &self.matches {
            if !leagues.contains(&m.league.as_str()) {
                leagues.push(&m.league);
            }
        }
        leagues
    }

    /// Number of matches.
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    /// Whether the board is empty.
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}
