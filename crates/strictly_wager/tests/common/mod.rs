//! Shared fixtures for engine integration tests.

#![allow(dead_code)]

use strictly_wager::{
    Amount, AwardRegistry, Currency, EngineConfig, MatchEngine, MatchId, Principal, TokenLedger,
};

/// Reference native stake.
pub const STAKE: Amount = 1_000_000;
/// Reference wrapped stake.
pub const WRAPPED_STAKE: Amount = 150_000;
/// Starting balance of every funded wallet.
pub const FUNDS: Amount = 100_000_000;
/// Reference creator address.
pub const CREATOR: &str = "ST3VZSF1PEM2Q1780M589P5DT53W4Y0YK4M3T7923";

pub fn p(name: &str) -> Principal {
    Principal::new(name)
}

pub fn p1() -> Principal {
    p("wallet_1")
}

pub fn p2() -> Principal {
    p("wallet_2")
}

pub fn p3() -> Principal {
    p("wallet_3")
}

pub fn admin() -> Principal {
    p("deployer")
}

pub fn creator() -> Principal {
    p(CREATOR)
}

/// Engine with three wallets funded in both currencies.
pub fn funded_engine(config: EngineConfig) -> MatchEngine {
    let mut engine = MatchEngine::in_memory(config).expect("valid config");
    for wallet in [p1(), p2(), p3()] {
        for currency in [Currency::Native, Currency::Wrapped] {
            engine
                .treasury_mut()
                .ledger_mut(currency)
                .mint(&wallet, FUNDS)
                .expect("faucet");
        }
    }
    engine
}

/// Both reference players buy in with the native stake.
pub fn setup_game<L: TokenLedger, A: AwardRegistry>(engine: &mut MatchEngine<L, A>) {
    engine
        .buy_in(&p1(), STAKE, Currency::Native)
        .expect("player 1 buy-in");
    engine
        .buy_in(&p2(), STAKE, Currency::Native)
        .expect("player 2 buy-in");
}

/// Funded engine with a started native match.
pub fn started() -> (MatchEngine, MatchId) {
    let mut engine = funded_engine(EngineConfig::default());
    setup_game(&mut engine);
    let id = engine.start_match(&p1()).expect("start");
    (engine, id)
}

/// Plays `squares` alternately from whoever is to move, returning each
/// turn's win flag.
pub fn play<L: TokenLedger, A: AwardRegistry>(
    engine: &mut MatchEngine<L, A>,
    squares: &[u8],
) -> Vec<bool> {
    squares
        .iter()
        .map(|square| {
            let state = engine.current_game_state();
            let turn = *state.turn_number();
            let seat: u8 = if turn % 2 == 0 { 1 } else { 2 };
            let caller = if seat == 1 { p1() } else { p2() };
            engine
                .process_turn(&caller, turn, seat, *square)
                .expect("legal turn")
        })
        .collect()
}

/// Player one wins on the top-left to bottom-right diagonal.
pub const DIAGONAL_WIN: [u8; 5] = [0, 1, 4, 2, 8];

/// Full board without a line.
pub const DRAW: [u8; 9] = [0, 1, 2, 4, 7, 3, 5, 8, 6];

pub fn balance<L: TokenLedger, A: AwardRegistry>(
    engine: &MatchEngine<L, A>,
    currency: Currency,
    who: &Principal,
) -> Amount {
    engine.balance_of(currency, who)
}
