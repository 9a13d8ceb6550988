use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use uuid::Uuid;

use wayfare_core::WayfareError;
use wayfare_domains::{Listing, Review, User};

use crate::jwt::AuthUser;
use crate::rest::error_response;
use crate::serializers::{ReviewInput, ReviewView, UserView};
use crate::AppState;

pub async fn list_reviews(
    State(state): State<Arc<AppState>>,
    Path(listing_id): Path<Uuid>,
) -> Response {
    match Listing::find_by_id(listing_id, &state.pool).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return error_response(WayfareError::NotFound(format!("listing {listing_id}")))
        }
        Err(e) => return error_response(e),
    }

    match Review::find_for_listing(listing_id, &state.pool).await {
        Ok(rows) => {
            let views: Vec<ReviewView> = rows.iter().map(ReviewView::from).collect();
            Json(serde_json::json!({ "reviews": views })).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// Create a review. The reviewer is always the authenticated caller;
/// the storage layer rejects out-of-range ratings and a second review
/// for the same (listing, reviewer) pair.
pub async fn create_review(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(listing_id): Path<Uuid>,
    Json(input): Json<ReviewInput>,
) -> Response {
    let review = match Review::create(
        listing_id,
        auth.user_id,
        input.rating,
        &input.comment,
        &state.pool,
    )
    .await
    {
        Ok(review) => review,
        Err(e) => return error_response(e),
    };

    // The insert succeeded, so the reviewer row exists.
    let reviewer = match User::find_by_id(auth.user_id, &state.pool).await {
        Ok(Some(user)) => user,
        Ok(None) => return error_response(WayfareError::NotFound("reviewer".to_string())),
        Err(e) => return error_response(e),
    };

    let view = ReviewView {
        id: review.id,
        reviewer: UserView::from(&reviewer),
        rating: review.rating,
        comment: review.comment,
        created_at: review.created_at,
    };
    (StatusCode::CREATED, Json(view)).into_response()
}

pub async fn delete_review(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Response {
    let review = match Review::find_by_id(id, &state.pool).await {
        Ok(Some(review)) => review,
        Ok(None) => return error_response(WayfareError::NotFound(format!("review {id}"))),
        Err(e) => return error_response(e),
    };

    if review.reviewer_id != auth.user_id {
        return error_response(WayfareError::Forbidden(
            "Only the reviewer may delete this review".to_string(),
        ));
    }

    match Review::delete(id, &state.pool).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}
