//! Tests for claims, fee splits and conservation of the pool.

mod common;

use common::*;
use strictly_wager::{
    Amount, AwardError, AwardRegistry, BuyIn, Creator, Currency, EngineConfig, EngineError,
    FeeSchedule, InMemoryAwards, InMemoryLedger, MatchEngine, MatchId, Outcome, Principal,
    TokenError, TokenLedger, Transfer, Treasury,
};

#[test]
fn test_wrong_buy_in_changes_nothing() {
    let mut engine = funded_engine(EngineConfig::default());
    let custody = engine.config().custody().clone();
    assert_eq!(
        engine.buy_in(&p1(), 500_000, Currency::Native),
        Err(EngineError::IncorrectBuyIn {
            expected: STAKE,
            actual: 500_000
        })
    );
    assert_eq!(balance(&engine, Currency::Native, &custody), 0);
    assert_eq!(engine.match_balance().unwrap(), 0);
    assert_eq!(engine.player_count(), 0);
}

#[test]
fn test_winner_claim_splits_pool_exactly() {
    let (mut engine, id) = started();
    let custody = engine.config().custody().clone();
    assert_eq!(engine.match_balance().unwrap(), STAKE);
    play(&mut engine, &DIAGONAL_WIN);

    assert!(engine.claim(&p1(), id).unwrap());
    assert_eq!(balance(&engine, Currency::Native, &p1()), FUNDS - STAKE + STAKE);
    assert_eq!(balance(&engine, Currency::Native, &creator()), STAKE);
    assert_eq!(balance(&engine, Currency::Native, &custody), 0);

    let record = engine.match_record(id).unwrap();
    assert!(*record.fees_paid());
    assert_eq!(record.nft_owner().as_ref(), Some(&p1()));
}

#[test]
fn test_claim_is_once_and_winner_only() {
    let (mut engine, id) = started();
    assert_eq!(engine.claim(&p1(), id), Err(EngineError::Unauthorized));
    play(&mut engine, &DIAGONAL_WIN);

    assert_eq!(engine.claim(&p2(), id), Err(EngineError::Unauthorized));
    assert_eq!(engine.claim(&p1(), 999), Err(EngineError::MatchNotFound(999)));
    assert_eq!(engine.claim_draw(&p1(), id), Err(EngineError::Unauthorized));
    engine.claim(&p1(), id).unwrap();
    assert_eq!(engine.claim(&p1(), id), Err(EngineError::Unauthorized));
    assert_eq!(balance(&engine, Currency::Native, &p1()), FUNDS);
}

#[test]
fn test_draw_claims_once_per_player() {
    let (mut engine, id) = started();
    let custody = engine.config().custody().clone();
    play(&mut engine, &DRAW);

    assert_eq!(engine.claim_draw(&p3(), id), Err(EngineError::Unauthorized));
    assert_eq!(engine.claim(&p1(), id), Err(EngineError::Unauthorized));
    assert!(engine.claim_draw(&p2(), id).unwrap());
    assert!(engine.claim_draw(&p1(), id).unwrap());
    assert_eq!(engine.claim_draw(&p1(), id), Err(EngineError::Unauthorized));
    assert_eq!(engine.claim_draw(&p2(), id), Err(EngineError::Unauthorized));

    assert_eq!(balance(&engine, Currency::Native, &p1()), FUNDS - STAKE / 2);
    assert_eq!(balance(&engine, Currency::Native, &p2()), FUNDS - STAKE / 2);
    assert_eq!(balance(&engine, Currency::Native, &creator()), STAKE);
    assert_eq!(balance(&engine, Currency::Native, &custody), 0);
}

#[test]
fn test_odd_pool_conserves_every_unit() {
    let fees = FeeSchedule::new(
        33,
        vec![
            Creator::new("Studio".to_string(), Principal::new("studio"), 60),
            Creator::new("Artist".to_string(), Principal::new("artist"), 40),
        ],
    );
    let config = EngineConfig::default()
        .with_fees(fees)
        .with_buy_in(BuyIn::new(1_000_001, 150_000));
    let mut engine = funded_engine(config);
    let custody = engine.config().custody().clone();
    engine.buy_in(&p1(), 1_000_001, Currency::Native).unwrap();
    engine.buy_in(&p2(), 1_000_001, Currency::Native).unwrap();
    let id = engine.start_match(&p1()).unwrap();
    play(&mut engine, &DIAGONAL_WIN);
    engine.claim(&p1(), id).unwrap();

    // 2_000_002 pool: 660_000 withheld, 1_340_002 prize.
    assert_eq!(balance(&engine, Currency::Native, &p1()), FUNDS - 1_000_001 + 1_340_002);
    assert_eq!(balance(&engine, Currency::Native, &p("artist")), 264_000);
    assert_eq!(balance(&engine, Currency::Native, &p("studio")), 396_000);
    assert_eq!(balance(&engine, Currency::Native, &custody), 0);
}

fn split_three_ways(shares: [u8; 3]) -> EngineConfig {
    let creators = ["alpha", "beta", "gamma"]
        .into_iter()
        .zip(shares)
        .map(|(name, share)| Creator::new(name.to_string(), Principal::new(name), share))
        .collect();
    EngineConfig::default().with_fees(FeeSchedule::new(50, creators))
}

#[test]
fn test_engine_rejects_overcommitted_creator_shares() {
    let config = split_three_ways([10, 60, 60]);
    assert!(config.validate().is_err());
    assert!(MatchEngine::in_memory(config).is_err());
}

#[test]
fn test_claim_never_touches_next_lobby_stake() {
    let mut engine = funded_engine(split_three_ways([10, 45, 45]));
    let custody = engine.config().custody().clone();
    setup_game(&mut engine);
    let id = engine.start_match(&p1()).unwrap();
    play(&mut engine, &DIAGONAL_WIN);

    engine.buy_in(&p3(), STAKE, Currency::Native).unwrap();
    assert_eq!(balance(&engine, Currency::Native, &custody), 3 * STAKE);

    engine.claim(&p1(), id).unwrap();
    let creators_paid: Amount = ["alpha", "beta", "gamma"]
        .iter()
        .map(|name| balance(&engine, Currency::Native, &p(name)))
        .sum();
    assert_eq!(creators_paid, STAKE);
    assert_eq!(balance(&engine, Currency::Native, &p1()), FUNDS);
    assert_eq!(balance(&engine, Currency::Native, &custody), STAKE);
}

#[test]
fn test_odd_draw_remainder_goes_to_creators() {
    let config = EngineConfig::default().with_buy_in(BuyIn::new(1_000_001, 150_000));
    let mut engine = funded_engine(config);
    let custody = engine.config().custody().clone();
    engine.buy_in(&p1(), 1_000_001, Currency::Native).unwrap();
    engine.buy_in(&p2(), 1_000_001, Currency::Native).unwrap();
    let id = engine.start_match(&p1()).unwrap();
    play(&mut engine, &DRAW);

    engine.claim_draw(&p1(), id).unwrap();
    engine.claim_draw(&p2(), id).unwrap();
    let paid_out: Amount = [p1(), p2()]
        .iter()
        .map(|who| balance(&engine, Currency::Native, who) - (FUNDS - 1_000_001))
        .sum();
    assert_eq!(paid_out, 1_000_000);
    assert_eq!(balance(&engine, Currency::Native, &creator()), 1_000_002);
    assert_eq!(balance(&engine, Currency::Native, &custody), 0);
}

#[test]
fn test_bomb_fees_join_the_prize() {
    let (mut engine, id) = started();
    let custody = engine.config().custody().clone();
    play(&mut engine, &[3, 5]);
    engine.use_bomb(&p1(), 5).unwrap();
    play(&mut engine, &DIAGONAL_WIN);
    engine.claim(&p1(), id).unwrap();

    // 2.5M pool splits evenly under the default 50% cut.
    assert_eq!(
        balance(&engine, Currency::Native, &p1()),
        FUNDS - STAKE - STAKE / 2 + 1_250_000
    );
    assert_eq!(balance(&engine, Currency::Native, &creator()), 1_250_000);
    assert_eq!(balance(&engine, Currency::Native, &custody), 0);
}

// ─────────────────────────────────────────────────────────────
//  Capability failures
// ─────────────────────────────────────────────────────────────

/// Ledger that refuses outgoing transfers from one account on demand.
#[derive(Debug)]
struct FreezableLedger {
    inner: InMemoryLedger,
    frozen: Option<Principal>,
}

impl TokenLedger for FreezableLedger {
    fn symbol(&self) -> &str {
        self.inner.symbol()
    }

    fn balance_of(&self, owner: &Principal) -> Amount {
        self.inner.balance_of(owner)
    }

    fn transfer(&mut self, from: &Principal, legs: &[Transfer]) -> Result<(), TokenError> {
        if self.frozen.as_ref() == Some(from) {
            return Err(TokenError::Rejected {
                reason: "account frozen".to_string(),
            });
        }
        self.inner.transfer(from, legs)
    }
}

/// Registry whose mint always fails.
#[derive(Debug, Default)]
struct BrokenAwards;

impl AwardRegistry for BrokenAwards {
    fn mint(&mut self, match_id: MatchId, _owner: &Principal) -> Result<(), AwardError> {
        Err(AwardError::AlreadyMinted { match_id })
    }

    fn burn(&mut self, match_id: MatchId, _holder: &Principal) -> Result<(), AwardError> {
        Err(AwardError::NotMinted { match_id })
    }

    fn owner_of(&self, _match_id: MatchId) -> Option<Principal> {
        None
    }
}

fn freezable_engine() -> MatchEngine<FreezableLedger, InMemoryAwards> {
    let ledger = |symbol: &str| {
        let mut inner = InMemoryLedger::new(symbol);
        for wallet in [p1(), p2()] {
            inner.mint(&wallet, FUNDS).unwrap();
        }
        FreezableLedger {
            inner,
            frozen: None,
        }
    };
    MatchEngine::new(
        EngineConfig::default(),
        Treasury::new(ledger("STX"), ledger("sBTC")),
        InMemoryAwards::new(),
    )
    .unwrap()
}

#[test]
fn test_failed_payout_leaves_claim_open() {
    let mut engine = freezable_engine();
    let custody = engine.config().custody().clone();
    setup_game(&mut engine);
    let id = engine.start_match(&p1()).unwrap();
    play(&mut engine, &DIAGONAL_WIN);

    engine.treasury_mut().ledger_mut(Currency::Native).frozen = Some(custody.clone());
    assert!(matches!(
        engine.claim(&p1(), id),
        Err(EngineError::Token(TokenError::Rejected { .. }))
    ));
    let record = engine.match_record(id).unwrap();
    assert!(!record.has_claimed(strictly_wager::PlayerNumber::One));
    assert!(!*record.fees_paid());
    assert_eq!(balance(&engine, Currency::Native, &custody), 2 * STAKE);

    engine.treasury_mut().ledger_mut(Currency::Native).frozen = None;
    assert!(engine.claim(&p1(), id).unwrap());
    assert_eq!(balance(&engine, Currency::Native, &custody), 0);
}

#[test]
fn test_failed_buy_in_transfer_keeps_seat_free() {
    let mut engine = freezable_engine();
    engine.treasury_mut().ledger_mut(Currency::Native).frozen = Some(p1());
    assert!(engine.buy_in(&p1(), STAKE, Currency::Native).is_err());
    assert_eq!(engine.player_count(), 0);
    assert_eq!(balance(&engine, Currency::Native, &p1()), FUNDS);
}

#[test]
fn test_failed_award_mint_aborts_winning_turn() {
    let mut engine = MatchEngine::new(
        EngineConfig::default(),
        Treasury::in_memory(),
        BrokenAwards,
    )
    .unwrap();
    for wallet in [p1(), p2()] {
        engine
            .treasury_mut()
            .ledger_mut(Currency::Native)
            .mint(&wallet, FUNDS)
            .unwrap();
    }
    setup_game(&mut engine);
    let id = engine.start_match(&p1()).unwrap();
    play(&mut engine, &DIAGONAL_WIN[..4]);

    assert!(matches!(
        engine.process_turn(&p1(), 4, 1, 8),
        Err(EngineError::Award(_))
    ));
    let record = engine.match_record(id).unwrap();
    assert_eq!(*record.outcome(), Outcome::Pending);
    assert_eq!(*record.turn(), 4);
    assert_eq!(engine.player_count(), 2);
}
