//! Match and outcome types for the betting board.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use time::OffsetDateTime;

use crate::error::MarketError;

/// Sport a match belongs to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Sport {
    /// Association football.
    #[default]
    Football,
    /// Basketball.
    Basketball,
    /// Tennis.
    Tennis,
    /// Volleyball.
    Volleyball,
}

/// Whether a match is in play.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum MatchStatus {
    /// In play.
    Live,
    /// Not started yet.
    #[default]
    Scheduled,
}

/// Outcome of a 1X2 market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum Pick {
    /// Home win.
    #[strum(to_string = "home", serialize = "1")]
    Home,
    /// Draw.
    #[strum(to_string = "draw", serialize = "x")]
    Draw,
    /// Away win.
    #[strum(to_string = "away", serialize = "2")]
    Away,
}

impl Pick {
    /// Label shown on the slip.
    pub fn label(&self) -> &'static str {
        match self {
            Pick::Home => "Home",
            Pick::Draw => "Draw",
            Pick::Away => "Away",
        }
    }
}

/// Decimal odds for each 1X2 outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOdds {
    /// Home win odd.
    pub home: Decimal,
    /// Draw odd.
    pub draw: Decimal,
    /// Away win odd.
    pub away: Decimal,
}

impl MatchOdds {
    /// Odd for a pick.
    pub fn get(&self, pick: Pick) -> Decimal {
        match pick {
            Pick::Home => self.home,
            Pick::Draw => self.draw,
            Pick::Away => self.away,
        }
    }

    /// Highest of the three odds.
    pub fn max(&self) -> Decimal {
        self.home.max(self.draw).max(self.away)
    }
}

/// A match listed on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// Unique match identifier (e.g. "match_1").
    pub id: String,
    /// Home team name.
    pub home_team: String,
    /// Away team name.
    pub away_team: String,
    /// League name.
    pub league: String,
    /// Sport.
    #[serde(default)]
    pub sport: Sport,
    /// Live or scheduled.
    #[serde(default)]
    pub status: MatchStatus,
    /// Kick-off time.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub kickoff: Option<OffsetDateTime>,
    /// 1X2 odds.
    pub odds: MatchOdds,
}

impl Match {
    /// "Home vs Away".
    pub fn title(&self) -> String {
        format!("{} vs {}", self.home_team, self.away_team)
    }

    /// Odd quoted for a pick.
    pub fn odd_for(&self, pick: Pick) -> Decimal {
        self.odds.get(pick)
    }

    /// Highest odd quoted on this match.
    pub fn max_odd(&self) -> Decimal {
        self.odds.max()
    }

    /// Whether the match is in play.
    pub fn is_live(&self) -> bool {
        self.status == MatchStatus::Live
    }

    /// `(match_id, label, odd)` triple for a slip selection.
    pub fn selection_for(&self, pick: Pick) -> Result<(String, String, Decimal), MarketError> {
        let odd = validate_odd(self.odd_for(pick))?;
        Ok((self.id.clone(), pick.label().to_string(), odd))
    }
}

/// Reject odds below 1.0.
pub fn validate_odd(odd: Decimal) -> Result<Decimal, MarketError> {
    if odd < Decimal::ONE {
        Err(MarketError::InvalidOdd(odd))
    } else {
        Ok(odd)
    }
}

/// Reject empty match ids.
pub fn validate_match_id(match_id: &str) -> Result<&str, MarketError> {
    if match_id.trim().is_empty() {
        Err(MarketError::EmptyMatchId)
    } else {
        Ok(match_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    fn test_match() -> Match {
        Match {
            id: "match_1".to_string(),
            home_team: "Arsenal".to_string(),
            away_team: "Chelsea".to_string(),
            league: "Premier League".to_string(),
            sport: Sport::Football,
            status: MatchStatus::Scheduled,
            kickoff: None,
            odds: MatchOdds {
                home: dec!(1.65),
                draw: dec!(3.40),
                away: dec!(4.75),
            },
        }
    }

    #[test]
    fn pick_from_string_works() {
        assert_eq!(Pick::from_str("home").unwrap(), Pick::Home);
        assert_eq!(Pick::from_str("X").unwrap(), Pick::Draw);
        assert_eq!(Pick::from_str("AWAY").unwrap(), Pick::Away);
        assert!(Pick::from_str("over").is_err());
    }

    #[test]
    fn pick_displays_canonical_name() {
        assert_eq!(Pick::Draw.to_string(), "draw");
        assert_eq!(Pick::Away.label(), "Away");
    }

    #[test]
    fn match_odds_lookup() {
        let m = test_match();
        assert_eq!(m.title(), "Arsenal vs Chelsea");
        assert_eq!(m.odd_for(Pick::Draw), dec!(3.40));
        assert_eq!(m.max_odd(), dec!(4.75));
    }

    #[test]
    fn selection_triple_uses_pick_label() {
        let m = test_match();
        let (id, label, odd) = m.selection_for(Pick::Home).unwrap();
        assert_eq!(id, "match_1");
        assert_eq!(label, "Home");
        assert_eq!(odd, dec!(1.65));
    }

    #[test]
    fn odds_below_one_rejected() {
        assert_eq!(validate_odd(dec!(0.95)), Err(MarketError::InvalidOdd(dec!(0.95))));
        assert_eq!(validate_odd(dec!(1.0)), Ok(dec!(1.0)));
        assert!(validate_match_id("  ").is_err());
    }

    #[test]
    fn match_deserializes_from_json() {
        let json = r#"{
            "id": "match_7",
            "home_team": "Real Madrid",
            "away_team": "Barcelona",
            "league": "La Liga",
            "status": "live",
            "kickoff": "2026-10-14T19:00:00Z",
            "odds": { "home": "2.10", "draw": "3.30", "away": "3.05" }
        }"#;

        let m: Match = serde_json::from_str(json).unwrap();
        assert!(m.is_live());
        assert_eq!(m.sport, Sport::Football);
        assert_eq!(m.odds.draw, dec!(3.3));
        assert!(m.kickoff.is_some());
    }
}
