//! Loan lifecycle endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::AppResult,
    models::loan::{CheckoutRequest, LoanView},
    services::{overdue, returns::ReturnOutcome},
};

/// Checkout request
#[derive(Deserialize, ToSchema)]
pub struct CheckoutRequestBody {
    /// Member ID
    pub member_id: i32,
    /// Item ID
    pub item_id: i32,
    /// Due date; defaults to the configured loan term when omitted
    pub due_date: Option<DateTime<Utc>>,
}

/// Checkout response
#[derive(Serialize, ToSchema)]
pub struct LoanResponse {
    /// Loan ID
    pub id: i32,
    /// Due date (ISO 8601 format)
    pub due_date: DateTime<Utc>,
    /// Status message
    pub message: String,
}

/// Return response with loan details
#[derive(Serialize, ToSchema)]
pub struct ReturnResponse {
    /// "returned", or "already_returned" for a repeated request
    pub status: String,
    /// Loan details
    pub loan: LoanView,
}

/// Loan listing query
#[derive(Deserialize, IntoParams)]
pub struct ListLoansQuery {
    /// Member ID
    pub member_id: i32,
    /// Also include returned loans
    pub include_history: Option<bool>,
}

/// Borrow an item
#[utoipa::path(
    post,
    path = "/loans",
    tag = "loans",
    request_body = CheckoutRequestBody,
    responses(
        (status = 201, description = "Loan created", body = LoanResponse),
        (status = 400, description = "Due date outside the policy window"),
        (status = 404, description = "Member or item not found"),
        (status = 409, description = "Already borrowed or no copies available")
    )
)]
pub async fn create_loan(
    State(state): State<crate::AppState>,
    Json(request): Json<CheckoutRequestBody>,
) -> AppResult<(StatusCode, Json<LoanResponse>)> {
    let (loan_id, due_date) = state
        .services
        .checkout
        .checkout(CheckoutRequest {
            member_id: request.member_id,
            item_id: request.item_id,
            due_date: request.due_date,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(LoanResponse {
            id: loan_id,
            due_date,
            message: "Item borrowed successfully".to_string(),
        }),
    ))
}

/// Return a borrowed item
#[utoipa::path(
    post,
    path = "/loans/{id}/return",
    tag = "loans",
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    responses(
        (status = 200, description = "Item returned (idempotent)", body = ReturnResponse),
        (status = 404, description = "Loan not found")
    )
)]
pub async fn return_loan(
    State(state): State<crate::AppState>,
    Path(loan_id): Path<i32>,
) -> AppResult<Json<ReturnResponse>> {
    let outcome = state.services.returns.return_item(loan_id).await?;

    let now = Utc::now();
    let (status, record) = match outcome {
        ReturnOutcome::Returned(record) => ("returned", record),
        ReturnOutcome::AlreadyReturned(record) => ("already_returned", record),
    };
    let due_status = overdue::evaluate(&record, now);

    Ok(Json(ReturnResponse {
        status: status.to_string(),
        loan: LoanView::new(record, due_status),
    }))
}

/// List a member's loans with due status
#[utoipa::path(
    get,
    path = "/loans",
    tag = "loans",
    params(ListLoansQuery),
    responses(
        (status = 200, description = "Member's loans", body = Vec<LoanView>),
        (status = 404, description = "Member not found")
    )
)]
pub async fn list_loans(
    State(state): State<crate::AppState>,
    Query(query): Query<ListLoansQuery>,
) -> AppResult<Json<Vec<LoanView>>> {
    let loans = state
        .services
        .loans
        .list_for_member(query.member_id, query.include_history.unwrap_or(false))
        .await?;
    Ok(Json(loans))
}
