//! Integration tests for the bet slip service.
//!
//! These drive whole sessions through the public library API: picking from
//! the board, pricing, placing, settling and persisting the account.

use std::path::PathBuf;

use betslip::account::{load_account, save_account, Account, BetLimits, BetStatus};
use betslip::error::{AccountError, SlipError};
use betslip::market::{MatchBoard, MatchFilter, MatchStatus, OddBand, Pick};
use betslip::session::Session;
use betslip::slip::{BetSlip, ClearMode, SelectAction, Selection};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const BOARD: &str = r#"[
    {"id": "match_1", "home_team": "Manchester City", "away_team": "Arsenal",
     "league": "Premier League", "status": "live",
     "odds": {"home": "1.65", "draw": "3.60", "away": "4.20"}},
    {"id": "match_2", "home_team": "Real Madrid", "away_team": "Barcelona",
     "league": "La Liga", "kickoff": "2026-10-14T20:00:00Z",
     "odds": {"home": "2.10", "draw": "3.30", "away": "1.90"}},
    {"id": "match_3", "home_team": "Bayern München", "away_team": "Borussia Dortmund",
     "league": "Bundesliga",
     "odds": {"home": "1.45", "draw": "1.80", "away": "1.95"}}
]"#;

fn temp_path() -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("betslip_it_{}.json", uuid::Uuid::new_v4()));
    p
}

fn session(balance: Decimal) -> Session {
    Session::new(
        Account::new(balance),
        MatchBoard::from_json(BOARD).unwrap(),
        BetLimits::default(),
    )
}

#[test]
fn accumulator_from_board_places_and_wins() {
    let mut s = session(dec!(1000));

    s.select_pick("match_1", Pick::Home).unwrap();
    s.select_pick("match_2", Pick::Away).unwrap();
    s.slip.set_stake(dec!(10));

    assert_eq!(s.slip.combined_odds(), dec!(3.135));
    assert_eq!(s.slip.potential_return(), dec!(31.35));

    let bet = s.place().unwrap();
    assert_eq!(bet.receipt.selections.len(), 2);
    assert_eq!(s.account.balance, dec!(990));
    assert!(s.slip.is_empty());

    s.settle(&bet.id, true).unwrap();
    assert_eq!(s.account.balance, dec!(1021.35));
    assert_eq!(s.account.stats.total_profit, dec!(21.35));
    assert_eq!(s.account.history(Some(BetStatus::Won)).len(), 1);
}

#[test]
fn changing_pick_on_a_match_replaces_in_place() {
    let mut s = session(dec!(1000));

    s.select_pick("match_1", Pick::Home).unwrap();
    s.select_pick("match_2", Pick::Draw).unwrap();
    s.select_pick("match_3", Pick::Away).unwrap();
    assert_eq!(
        s.select_pick("match_2", Pick::Home).unwrap(),
        SelectAction::Replaced
    );

    let picked: Vec<_> = s
        .slip
        .selections()
        .iter()
        .map(|sel| (sel.match_id.as_str(), sel.label.as_str()))
        .collect();
    assert_eq!(
        picked,
        vec![("match_1", "Home"), ("match_2", "Home"), ("match_3", "Away")]
    );
    assert_eq!(s.slip.combined_odds(), dec!(1.65) * dec!(2.10) * dec!(1.95));
}

#[test]
fn placement_errors_are_distinct_and_recoverable() {
    let mut s = session(dec!(20));

    assert_eq!(
        s.place().unwrap_err(),
        AccountError::Slip(SlipError::EmptySlip)
    );

    s.select_pick("match_3", Pick::Home).unwrap();
    assert_eq!(
        s.place().unwrap_err(),
        AccountError::Slip(SlipError::InvalidStake {
            stake: Decimal::ZERO
        })
    );

    s.slip.set_stake_input("5");
    assert_eq!(s.place().unwrap_err().code(), "BELOW_MINIMUM");

    s.slip.set_stake_input("25");
    assert_eq!(s.place().unwrap_err().code(), "INSUFFICIENT_BALANCE");

    s.slip.set_stake_input("20");
    let bet = s.place().unwrap();
    assert_eq!(bet.receipt.potential_return, dec!(29));
    assert_eq!(s.account.balance, Decimal::ZERO);
}

#[test]
fn receipt_survives_later_slip_edits() {
    let mut slip = BetSlip::new();
    slip.select_outcome("match_1", "Home", dec!(1.65));
    slip.set_stake(dec!(10));
    let receipt = slip.place_bet().unwrap();

    slip.select_outcome("match_1", "Home", dec!(1.65));
    slip.select_outcome("match_2", "Away", dec!(1.90));
    slip.clear(ClearMode::ResetStake);

    assert_eq!(
        receipt.selections,
        vec![Selection::new("match_1", "Home", dec!(1.65))]
    );
    assert_eq!(receipt.potential_return, dec!(16.50));
}

#[test]
fn board_filters_compose() {
    let board = MatchBoard::from_json(BOARD).unwrap();

    let live = MatchFilter {
        status: Some(MatchStatus::Live),
        ..Default::default()
    };
    assert_eq!(board.filter(&live).len(), 1);

    let low = MatchFilter {
        odd_band: Some(OddBand::Low),
        ..Default::default()
    };
    let ids: Vec<_> = board.filter(&low).iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["match_3"]);

    let search = MatchFilter {
        search: Some("BARCA".to_string()),
        ..Default::default()
    };
    assert!(board.filter(&search).is_empty());

    let search = MatchFilter {
        search: Some("barcelona".to_string()),
        ..Default::default()
    };
    assert_eq!(board.filter(&search)[0].id, "match_2");
}

#[test]
fn account_persists_across_sessions() {
    let path = temp_path();

    let mut s = session(dec!(500));
    s.select_pick("match_2", Pick::Home).unwrap();
    s.slip.set_stake(dec!(50));
    let bet = s.place().unwrap();
    s.settle(&bet.id, false).unwrap();
    save_account(&s.account, &path).unwrap();

    let restored = load_account(&path).unwrap().unwrap();
    assert_eq!(restored.balance, dec!(450));
    assert_eq!(restored.stats.total_bets, 1);
    assert_eq!(restored.stats.total_profit, dec!(-50));
    assert_eq!(restored.history[0].status, BetStatus::Lost);

    let resumed = Session::new(
        restored,
        MatchBoard::from_json(BOARD).unwrap(),
        BetLimits::default(),
    );
    assert!(resumed.slip.is_empty());

    std::fs::remove_file(&path).unwrap();
}
