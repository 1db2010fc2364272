//! Board filtering.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use strum::{Display, EnumString};

use crate::error::MarketError;

use super::types::{Match, MatchStatus, Sport};

/// Odd range, judged on a match's highest odd.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OddBand {
    /// Highest odd at most 2.
    Low,
    /// Highest odd above 2, at most 4.
    Medium,
    /// Highest odd above 4.
    High,
}

impl OddBand {
    /// Whether a highest odd falls in this band.
    pub fn contains(&self, max_odd: Decimal) -> bool {
        let two = Decimal::TWO;
        let four = Decimal::new(4, 0);
        match self {
            OddBand::Low => max_odd <= two,
            OddBand::Medium => max_odd > two && max_odd <= four,
            OddBand::High => max_odd > four,
        }
    }
}

/// Board filter. `None` fields match everything.
#[derive(Debug, Clone, Default)]
pub struct MatchFilter {
    /// Sport.
    pub sport: Option<Sport>,
    /// League name, case-insensitive.
    pub league: Option<String>,
    /// Live or scheduled.
    pub status: Option<MatchStatus>,
    /// Odd band.
    pub odd_band: Option<OddBand>,
    /// Team name substring, case-insensitive.
    pub search: Option<String>,
}

/// Raw filter values as a UI sends them; "all" or empty means unset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterParams {
    /// Sport name.
    #[serde(default)]
    pub sport: Option<String>,
    /// League name.
    #[serde(default)]
    pub league: Option<String>,
    /// "live" or "scheduled".
    #[serde(default)]
    pub status: Option<String>,
    /// "low", "medium" or "high".
    #[serde(default)]
    pub odd: Option<String>,
    /// Team search text.
    #[serde(default)]
    pub search: Option<String>,
}

/// Whether a query value means "no filter" (empty or "all", any case).
pub(crate) fn is_unset(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.eq_ignore_ascii_case("all")
}

fn parse_param<T: FromStr>(field: &str, value: Option<&str>) -> Result<Option<T>, MarketError> {
    match value.filter(|v| !is_unset(v)) {
        None => Ok(None),
        Some(v) => v
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| MarketError::ParseError(format!("unknown {field} '{v}'"))),
    }
}

impl TryFrom<FilterParams> for MatchFilter {
    type Error = MarketError;

    fn try_from(params: FilterParams) -> Result<Self, Self::Error> {
        Ok(Self {
            sport: parse_param("sport", params.sport.as_deref())?,
            league: params.league.filter(|l| !is_unset(l)),
            status: parse_param("status", params.status.as_deref())?,
            odd_band: parse_param("odd band", params.odd.as_deref())?,
            search: params.search.filter(|s| !s.trim().is_empty()),
        })
    }
}

impl MatchFilter {
    /// Whether a match passes every set criterion.
    pub fn matches(&self, m: &Match) -> bool {
        if self.sport.is_some_and(|s| s != m.sport) {
            return false;
        }
        if self.status.is_some_and(|s| s != m.status) {
            return false;
        }
        if let Some(league) = self.league.as_deref().filter(|l| !l.is_empty()) {
            if !league.eq_ignore_ascii_case(&m.league) {
                return false;
            }
        }
        if self.odd_band.is_some_and(|band| !band.contains(m.max_odd())) {
            return false;
        }
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            return m.home_team.to_lowercase().contains(&needle)
                || m.away_team.to_lowercase().contains(&needle);
        }
        true
    }

    /// Whether no criterion is set.
    pub fn is_empty(&self) -> bool {
        self.sport.is_none()
            && self.league.is_none()
            && self.status.is_none()
            && self.odd_band.is_none()
            && self.search.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::types::MatchOdds;
    use rust_decimal_macros::dec;

    fn test_match(home: &str, away: &str, max: Decimal, status: MatchStatus) -> Match {
        Match {
            id: format!("{home}-{away}"),
            home_team: home.to_string(),
            away_team: away.to_string(),
            league: "Serie A".to_string(),
            sport: Sport::Football,
            status,
            kickoff: None,
            odds: MatchOdds {
                home: dec!(1.30),
                draw: dec!(1.50),
                away: max,
            },
        }
    }

    #[test]
    fn odd_band_boundaries() {
        assert!(OddBand::Low.contains(dec!(2)));
        assert!(!OddBand::Low.contains(dec!(2.01)));
        assert!(OddBand::Medium.contains(dec!(2.01)));
        assert!(OddBand::Medium.contains(dec!(4)));
        assert!(!OddBand::Medium.contains(dec!(2)));
        assert!(OddBand::High.contains(dec!(4.01)));
        assert!(!OddBand::High.contains(dec!(4)));
    }

    #[test]
    fn empty_filter_matches_all() {
        let filter = MatchFilter::default();
        assert!(filter.is_empty());
        assert!(filter.matches(&test_match("Juventus", "Inter Milan", dec!(5), MatchStatus::Live)));
    }

    #[test]
    fn search_is_case_insensitive_on_either_team() {
        let m = test_match("Juventus", "Inter Milan", dec!(3), MatchStatus::Scheduled);
        let filter = MatchFilter {
            search: Some("inter".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&m));

        let filter = MatchFilter {
            search: Some("Arsenal".to_string()),
            ..Default::default()
        };
        assert!(!filter.matches(&m));
    }

    #[test]
    fn params_treat_all_as_unset() {
        let filter = MatchFilter::try_from(FilterParams {
            sport: Some("all".to_string()),
            league: Some("All".to_string()),
            status: Some("LIVE".to_string()),
            odd: Some("high".to_string()),
            search: Some("  ".to_string()),
        })
        .unwrap();

        assert_eq!(filter.sport, None);
        assert_eq!(filter.league, None);
        assert_eq!(filter.status, Some(MatchStatus::Live));
        assert_eq!(filter.odd_band, Some(OddBand::High));
        assert_eq!(filter.search, None);
    }

    #[test]
    fn params_reject_unknown_values() {
        let result = MatchFilter::try_from(FilterParams {
            odd: Some("huge".to_string()),
            ..Default::default()
        });
        assert!(matches!(result, Err(MarketError::ParseError(_))));
    }

    #[test]
    fn criteria_combine() {
        let m = test_match("Juventus", "Inter Milan", dec!(3), MatchStatus::Live);
        let filter = MatchFilter {
            status: Some(MatchStatus::Live),
            league: Some("serie a".to_string()),
            odd_band: Some(OddBand::Medium),
            ..Default::default()
        };
        assert!(filter.matches(&m));

        let filter = MatchFilter {
            status: Some(MatchStatus::Live),
            odd_band: Some(OddBand::High),
            ..Default::default()
        };
        assert!(!filter.matches(&m));

        let filter = MatchFilter {
            sport: Some(Sport::Basketball),
            ..Default::default()
        };
        assert!(!filter.matches(&m));
    }
}
