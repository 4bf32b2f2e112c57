//! Creator earnings: balance, ledger history and payout requests.
//!
//! ```text
//! GET /api/monetization/payout
//! POST /api/monetization/payout {"amountCents":10000}
//! ```
//!
//! The balance is recomputed from the ledger on every request.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{LedgerTransaction, PayoutSummary};
use crate::inbound::http::ApiResult;
use crate::inbound::http::guard::CurrentUser;
use crate::inbound::http::schemas::{ErrorSchema, LedgerTransactionSchema};
use crate::inbound::http::state::HttpState;

/// Payout request body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayoutRequest {
    /// Amount in cents; at least the configured minimum.
    #[schema(example = 10000)]
    pub amount_cents: i64,
}

/// Balance and ledger history.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayoutSummaryResponse {
    /// Completed revenue minus completed payouts.
    pub available_cents: i64,
    /// Available balance not reserved by pending payouts.
    pub requestable_cents: i64,
    pub completed_revenue_cents: i64,
    pub completed_payout_cents: i64,
    pub pending_payout_cents: i64,
    /// Newest first.
    #[schema(value_type = Vec<LedgerTransactionSchema>)]
    pub transactions: Vec<LedgerTransaction>,
}

impl From<PayoutSummary> for PayoutSummaryResponse {
    fn from(summary: PayoutSummary) -> Self {
        let balance = summary.balance;
        Self {
            available_cents: balance.available_cents(),
            requestable_cents: balance.requestable_cents(),
            completed_revenue_cents: balance.completed_revenue_cents,
            completed_payout_cents: balance.completed_payout_cents,
            pending_payout_cents: balance.pending_payout_cents,
            transactions: summary.transactions,
        }
    }
}

/// The caller's balance and ledger.
#[utoipa::path(
    get,
    path = "/api/monetization/payout",
    responses(
        (status = 200, description = "Balance and history", body = PayoutSummaryResponse),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["monetization"],
    operation_id = "payoutSummary"
)]
#[get("/monetization/payout")]
pub async fn payout_summary(
    state: web::Data<HttpState>,
    CurrentUser(caller): CurrentUser,
) -> ApiResult<web::Json<PayoutSummaryResponse>> {
    let summary = state.payouts.summary(caller.user_id()).await?;
    Ok(web::Json(summary.into()))
}

/// Request a payout of part of the available balance.
///
/// Requests under the minimum or above the requestable balance get `400`
/// with "Minimum payout amount is $100" or "Insufficient balance".
#[utoipa::path(
    post,
    path = "/api/monetization/payout",
    request_body = PayoutRequest,
    responses(
        (status = 201, description = "Pending payout recorded", body = LedgerTransactionSchema),
        (status = 400, description = "Below minimum or insufficient balance", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["monetization"],
    operation_id = "requestPayout"
)]
#[post("/monetization/payout")]
pub async fn request_payout(
    state: web::Data<HttpState>,
    CurrentUser(caller): CurrentUser,
    payload: web::Json<PayoutRequest>,
) -> ApiResult<HttpResponse> {
    let row = state
        .payouts
        .request_payout(caller.user_id(), payload.amount_cents)
        .await?;
    Ok(HttpResponse::Created().json(row))
}
