//! REST routes over the match engine.

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use strictly_wager::{
    Amount, Board, BombStatus, Currency, FeeInfo, GameState, Match, MatchHistory, MatchId,
    Outcome, Principal,
};
use tracing::{debug, info, instrument};

/// Header carrying the caller's identity.
pub const PRINCIPAL_HEADER: &str = "x-principal";

/// Builds the router over shared engine state.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Registration and play
        .route("/buy-in", post(buy_in))
        .route("/matches/start", post(start_match))
        .route("/turns", post(process_turn))
        .route("/bombs", get(bomb_status).post(use_bomb))
        // Settlement
        .route("/matches/{id}/claim", post(claim))
        .route("/matches/{id}/claim-draw", post(claim_draw))
        .route("/matches/{id}/burn-award", post(burn_award))
        // Admin
        .route("/admin/force-draw", post(admin_force_draw))
        .route("/admin/currency", post(set_preferred_currency))
        .route("/faucet", post(faucet))
        // Queries
        .route("/fees", get(fee_info))
        .route("/state", get(current_game_state))
        .route("/matches/{id}", get(match_record))
        .route("/matches/{id}/history", get(match_history))
        .route("/matches/{id}/winner", get(match_winner))
        .route("/matches/{id}/board", get(match_data))
        .route("/players/count", get(player_count))
        .route("/balance", get(match_balance))
        .route("/creator-cut", get(creator_cut))
        .route("/balances/{currency}/{principal}", get(balance_of))
        .with_state(state)
}

/// Reads the caller from [`PRINCIPAL_HEADER`].
fn require_principal(headers: &HeaderMap) -> Result<Principal, ApiError> {
    headers
        .get(PRINCIPAL_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(Principal::new)
        .ok_or(ApiError::MissingPrincipal)
}

// ─────────────────────────────────────────────────────────────
//  Request and response bodies
// ─────────────────────────────────────────────────────────────

/// Body of `POST /buy-in`.
#[derive(Debug, Deserialize)]
pub struct BuyInRequest {
    amount: Amount,
    currency: Currency,
}

/// Body of `POST /turns`.
#[derive(Debug, Deserialize)]
pub struct TurnRequest {
    turn_number: u32,
    player_number: u8,
    square: u8,
}

/// Body of `POST /bombs`.
#[derive(Debug, Deserialize)]
pub struct BombRequest {
    square: u8,
}

/// Body of `POST /admin/currency`.
#[derive(Debug, Deserialize)]
pub struct CurrencyRequest {
    currency: Currency,
}

/// Body of `POST /faucet`.
#[derive(Debug, Deserialize)]
pub struct FaucetRequest {
    currency: Currency,
    #[serde(default)]
    amount: Option<Amount>,
}

/// Result flag of a mutating action.
#[derive(Debug, Serialize)]
pub struct ActionResponse {
    ok: bool,
}

/// Id of a freshly started match.
#[derive(Debug, Serialize)]
pub struct StartResponse {
    match_id: MatchId,
}

/// Currency now accepted by fresh lobbies.
#[derive(Debug, Serialize)]
pub struct CurrencyResponse {
    currency: Currency,
}

/// A single amount.
#[derive(Debug, Serialize)]
pub struct AmountResponse {
    amount: Amount,
}

/// Filled lobby seats.
#[derive(Debug, Serialize)]
pub struct CountResponse {
    players: usize,
}

// ─────────────────────────────────────────────────────────────
//  Registration and play
// ─────────────────────────────────────────────────────────────

#[instrument(skip(state, headers))]
async fn buy_in(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<BuyInRequest>,
) -> Result<Json<ActionResponse>, ApiError> {
    let caller = require_principal(&headers)?;
    let ok = state
        .engine()
        .lock()
        .await
        .buy_in(&caller, req.amount, req.currency)?;
    Ok(Json(ActionResponse { ok }))
}

#[instrument(skip(state, headers))]
async fn start_match(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<StartResponse>, ApiError> {
    let caller = require_principal(&headers)?;
    let match_id = state.engine().lock().await.start_match(&caller)?;
    Ok(Json(StartResponse { match_id }))
}

#[instrument(skip(state, headers))]
async fn process_turn(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<TurnRequest>,
) -> Result<Json<ActionResponse>, ApiError> {
    let caller = require_principal(&headers)?;
    let ok = state.engine().lock().await.process_turn(
        &caller,
        req.turn_number,
        req.player_number,
        req.square,
    )?;
    Ok(Json(ActionResponse { ok }))
}

#[instrument(skip(state, headers))]
async fn use_bomb(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<BombRequest>,
) -> Result<Json<ActionResponse>, ApiError> {
    let caller = require_principal(&headers)?;
    let ok = state.engine().lock().await.use_bomb(&caller, req.square)?;
    Ok(Json(ActionResponse { ok }))
}

// ─────────────────────────────────────────────────────────────
//  Settlement
// ─────────────────────────────────────────────────────────────

#[instrument(skip(state, headers))]
async fn claim(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<MatchId>,
) -> Result<Json<ActionResponse>, ApiError> {
    let caller = require_principal(&headers)?;
    let ok = state.engine().lock().await.claim(&caller, id)?;
    Ok(Json(ActionResponse { ok }))
}

#[instrument(skip(state, headers))]
async fn claim_draw(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<MatchId>,
) -> Result<Json<ActionResponse>, ApiError> {
    let caller = require_principal(&headers)?;
    let ok = state.engine().lock().await.claim_draw(&caller, id)?;
    Ok(Json(ActionResponse { ok }))
}

#[instrument(skip(state, headers))]
async fn burn_award(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<MatchId>,
) -> Result<Json<ActionResponse>, ApiError> {
    let caller = require_principal(&headers)?;
    let ok = state.engine().lock().await.burn_award(&caller, id)?;
    Ok(Json(ActionResponse { ok }))
}

// ─────────────────────────────────────────────────────────────
//  Admin
// ─────────────────────────────────────────────────────────────

#[instrument(skip(state, headers))]
async fn admin_force_draw(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ActionResponse>, ApiError> {
    let caller = require_principal(&headers)?;
    let ok = state.engine().lock().await.admin_force_draw(&caller)?;
    Ok(Json(ActionResponse { ok }))
}

#[instrument(skip(state, headers))]
async fn set_preferred_currency(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CurrencyRequest>,
) -> Result<Json<CurrencyResponse>, ApiError> {
    let caller = require_principal(&headers)?;
    let currency = state
        .engine()
        .lock()
        .await
        .set_preferred_currency(&caller, req.currency)?;
    Ok(Json(CurrencyResponse { currency }))
}

/// Credits test funds to the caller.
#[instrument(skip(state, headers))]
async fn faucet(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<FaucetRequest>,
) -> Result<Json<AmountResponse>, ApiError> {
    let caller = require_principal(&headers)?;
    let amount = req.amount.unwrap_or(state.faucet_amount());
    let balance = state
        .engine()
        .lock()
        .await
        .treasury_mut()
        .ledger_mut(req.currency)
        .mint(&caller, amount)?;
    info!(caller = %caller, currency = %req.currency, amount, "Faucet grant");
    Ok(Json(AmountResponse { amount: balance }))
}

// ─────────────────────────────────────────────────────────────
//  Queries
// ─────────────────────────────────────────────────────────────

async fn fee_info(State(state): State<AppState>) -> Json<FeeInfo> {
    Json(state.engine().lock().await.fee_info())
}

async fn current_game_state(State(state): State<AppState>) -> Json<GameState> {
    let snapshot = state.engine().lock().await.current_game_state();
    debug!(turn = snapshot.turn_number(), "State served");
    Json(snapshot)
}

async fn match_record(
    State(state): State<AppState>,
    Path(id): Path<MatchId>,
) -> Result<Json<Match>, ApiError> {
    let engine = state.engine().lock().await;
    Ok(Json(engine.match_record(id)?.clone()))
}

async fn match_history(
    State(state): State<AppState>,
    Path(id): Path<MatchId>,
) -> Result<Json<MatchHistory>, ApiError> {
    Ok(Json(state.engine().lock().await.match_history(id)?))
}

async fn match_winner(
    State(state): State<AppState>,
    Path(id): Path<MatchId>,
) -> Result<Json<Outcome>, ApiError> {
    Ok(Json(state.engine().lock().await.match_winner(id)?))
}

async fn match_data(
    State(state): State<AppState>,
    Path(id): Path<MatchId>,
) -> Result<Json<Board>, ApiError> {
    Ok(Json(state.engine().lock().await.match_data(id)?))
}

async fn bomb_status(State(state): State<AppState>) -> Json<BombStatus> {
    Json(state.engine().lock().await.bomb_status())
}

async fn player_count(State(state): State<AppState>) -> Json<CountResponse> {
    let players = state.engine().lock().await.player_count();
    Json(CountResponse { players })
}

async fn match_balance(State(state): State<AppState>) -> Result<Json<AmountResponse>, ApiError> {
    let amount = state.engine().lock().await.match_balance()?;
    Ok(Json(AmountResponse { amount }))
}

async fn creator_cut(State(state): State<AppState>) -> Json<AmountResponse> {
    let amount = state.engine().lock().await.creator_cut();
    Json(AmountResponse { amount })
}

async fn balance_of(
    State(state): State<AppState>,
    Path((currency, principal)): Path<(Currency, Principal)>,
) -> Json<AmountResponse> {
    let amount = state.engine().lock().await.balance_of(currency, &principal);
    Json(AmountResponse { amount })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_principal_header_is_trimmed() {
        let mut headers = HeaderMap::new();
        headers.insert(PRINCIPAL_HEADER, HeaderValue::from_static(" wallet_1 "));
        assert_eq!(
            require_principal(&headers).unwrap(),
            Principal::new("wallet_1")
        );
    }

    #[test]
    fn test_missing_or_blank_principal() {
        let mut headers = HeaderMap::new();
        assert!(matches!(
            require_principal(&headers),
            Err(ApiError::MissingPrincipal)
        ));
        headers.insert(PRINCIPAL_HEADER, HeaderValue::from_static("  "));
        assert!(matches!(
            require_principal(&headers),
            Err(ApiError::MissingPrincipal)
        ));
    }
}
