//! Tests for admin escape hatches and award burning.

mod common;

use common::*;
use strictly_wager::{AwardRegistry, Currency, EngineConfig, EngineError, Outcome};

#[test]
fn test_admin_force_draw_in_progress_match() {
    let (mut engine, id) = started();
    play(&mut engine, &[0, 4]);

    assert_eq!(engine.admin_force_draw(&p1()), Err(EngineError::Unauthorized));
    assert!(engine.admin_force_draw(&admin()).unwrap());

    assert_eq!(engine.player_count(), 0);
    assert_eq!(engine.match_winner(id).unwrap(), Outcome::Draw);
    assert!(engine.claim_draw(&p1(), id).unwrap());
    assert!(engine.claim_draw(&p2(), id).unwrap());
    assert_eq!(balance(&engine, Currency::Native, &p1()), FUNDS - STAKE / 2);
}

#[test]
fn test_lobby_rejects_third_and_repeat_players() {
    let mut engine = funded_engine(EngineConfig::default());
    engine.buy_in(&p1(), STAKE, Currency::Native).unwrap();
    assert_eq!(
        engine.buy_in(&p1(), STAKE, Currency::Native),
        Err(EngineError::Unauthorized)
    );
    engine.buy_in(&p2(), STAKE, Currency::Native).unwrap();
    assert_eq!(
        engine.buy_in(&p3(), STAKE, Currency::Native),
        Err(EngineError::TooManyPlayers)
    );
    assert_eq!(balance(&engine, Currency::Native, &p3()), FUNDS);
}

#[test]
fn test_start_needs_two_players_and_a_stakeholder() {
    let mut engine = funded_engine(EngineConfig::default());
    assert_eq!(engine.start_match(&admin()), Err(EngineError::NotEnoughPlayers));
    setup_game(&mut engine);
    assert_eq!(engine.start_match(&p3()), Err(EngineError::Unauthorized));
    assert_eq!(engine.start_match(&p2()), Ok(1));
}

#[test]
fn test_winner_burns_award() {
    let (mut engine, id) = started();
    play(&mut engine, &DIAGONAL_WIN);
    engine.claim(&p1(), id).unwrap();

    assert_eq!(engine.burn_award(&p2(), id), Err(EngineError::Unauthorized));
    assert_eq!(engine.burn_award(&p1(), 42), Err(EngineError::UnknownMatch(42)));
    assert!(engine.burn_award(&p1(), id).unwrap());

    assert_eq!(engine.awards().owner_of(id), None);
    assert!(engine.match_record(id).unwrap().nft_owner().is_none());
    assert_eq!(engine.burn_award(&p1(), id), Err(EngineError::UnknownMatch(id)));
}

#[test]
fn test_drawn_match_has_no_award() {
    let (mut engine, id) = started();
    play(&mut engine, &DRAW);
    assert_eq!(engine.awards().owner_of(id), None);
    assert_eq!(engine.burn_award(&p1(), id), Err(EngineError::UnknownMatch(id)));
}

#[test]
fn test_fee_info_reference_deployment() {
    let engine = funded_engine(EngineConfig::default());
    let info = engine.fee_info();
    assert_eq!(*info.creator_cut(), 500_000);
    assert_eq!(*info.match_cut(), 500_000);
    assert_eq!(*info.creators()[0].percent(), 100);
    assert_eq!(info.creators()[0].name(), "DeOrganized");
    assert_eq!(info.creators()[0].address(), &creator());
    assert_eq!(engine.creator_cut(), 500_000);
}

#[test]
fn test_current_state_after_start() {
    let (engine, id) = started();
    let state = engine.current_game_state();
    assert_eq!(state.active_player().as_ref(), Some(&p1()));
    assert_eq!(*state.turn_number(), 0);
    assert!(*state.match_in_progress());
    assert_eq!(*state.current_match_id(), Some(id));
    assert!(state.board().squares().iter().all(Option::is_none));
}
