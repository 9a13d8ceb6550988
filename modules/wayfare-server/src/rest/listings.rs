use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

use wayfare_core::WayfareError;
use wayfare_domains::{Listing, ListingFilters, PropertyType, Review, ReviewWithReviewer, User};

use crate::jwt::AuthUser;
use crate::rest::error_response;
use crate::serializers::{listing_view, ListingInput, ListingView};
use crate::AppState;

#[derive(Deserialize)]
pub struct ListingsQuery {
    property_type: Option<String>,
    is_active: Option<bool>,
    max_guests: Option<i32>,
    search: Option<String>,
    limit: Option<i64>,
    offset: Option<i64>,
}

pub async fn list_listings(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListingsQuery>,
) -> Response {
    let property_type = match params.property_type.as_deref() {
        Some(raw) => match PropertyType::from_str(raw) {
            Ok(pt) => Some(pt),
            Err(e) => return error_response(e),
        },
        None => None,
    };

    let limit = params.limit.unwrap_or(20);
    let offset = params.offset.unwrap_or(0);
    for (field, value) in [("limit", limit), ("offset", offset)] {
        if value < 0 {
            return error_response(WayfareError::validation(field, "must not be negative"));
        }
    }

    let filters = ListingFilters {
        property_type,
        is_active: params.is_active,
        max_guests: params.max_guests,
        created_after: None,
        search: params.search,
        limit: Some(limit.min(100)),
        offset: Some(offset),
    };

    let listings = match Listing::find_filtered(&filters, &state.pool).await {
        Ok(listings) => listings,
        Err(e) => return error_response(e),
    };

    match assemble_views(&listings, &state).await {
        Ok(views) => Json(serde_json::json!({ "listings": views })).into_response(),
        Err(e) => error_response(e),
    }
}

/// Batch-load hosts and reviews for a page of listings, then assemble
/// read representations without per-row lookups.
async fn assemble_views(
    listings: &[Listing],
    state: &AppState,
) -> Result<Vec<ListingView>, WayfareError> {
    let listing_ids: Vec<Uuid> = listings.iter().map(|l| l.id).collect();
    let host_ids: Vec<Uuid> = listings.iter().map(|l| l.host_id).collect();

    let reviews = Review::find_for_listings(&listing_ids, &state.pool).await?;
    let hosts = User::find_by_ids(&host_ids, &state.pool).await?;
    let hosts_by_id: HashMap<Uuid, &User> = hosts.iter().map(|u| (u.id, u)).collect();

    let mut reviews_by_listing: HashMap<Uuid, Vec<ReviewWithReviewer>> = HashMap::new();
    for review in reviews {
        reviews_by_listing.entry(review.listing_id).or_default().push(review);
    }

    let views = listings
        .iter()
        .filter_map(|listing| {
            let host = hosts_by_id.get(&listing.host_id)?;
            let listing_reviews = reviews_by_listing.remove(&listing.id).unwrap_or_default();
            Some(listing_view(listing, host, &listing_reviews))
        })
        .collect();

    Ok(views)
}

pub async fn create_listing(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(input): Json<ListingInput>,
) -> Response {
    let new_listing = input.into_new_listing();

    let listing = match Listing::create(&new_listing, auth.user_id, &state.pool).await {
        Ok(listing) => listing,
        Err(e) => return error_response(e),
    };

    match load_view(&listing, &state).await {
        Ok(view) => (StatusCode::CREATED, Json(view)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn listing_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Response {
    let listing = match Listing::find_by_id(id, &state.pool).await {
        Ok(Some(listing)) => listing,
        Ok(None) => return error_response(WayfareError::NotFound(format!("listing {id}"))),
        Err(e) => return error_response(e),
    };

    match load_view(&listing, &state).await {
        Ok(view) => Json(view).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn update_listing(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(input): Json<ListingInput>,
) -> Response {
    match require_host(id, &auth, &state).await {
        Ok(()) => {}
        Err(e) => return error_response(e),
    }

    let updated = match Listing::update(id, &input.into_new_listing(), None, &state.pool).await {
        Ok(listing) => listing,
        Err(e) => return error_response(e),
    };

    match load_view(&updated, &state).await {
        Ok(view) => Json(view).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn delete_listing(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Response {
    match require_host(id, &auth, &state).await {
        Ok(()) => {}
        Err(e) => return error_response(e),
    }

    match Listing::delete(id, &state.pool).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

/// Only the host may mutate their listing.
async fn require_host(id: Uuid, auth: &AuthUser, state: &AppState) -> Result<(), WayfareError> {
    let listing = Listing::find_by_id(id, &state.pool)
        .await?
        .ok_or_else(|| WayfareError::NotFound(format!("listing {id}")))?;

    if listing.host_id != auth.user_id {
        return Err(WayfareError::Forbidden(
            "Only the host may modify this listing".to_string(),
        ));
    }
    Ok(())
}

async fn load_view(listing: &Listing, state: &AppState) -> Result<ListingView, WayfareError> {
    let host = User::find_by_id(listing.host_id, &state.pool)
        .await?
        .ok_or_else(|| {
            warn!(listing_id = %listing.id, "Listing host row missing");
            WayfareError::NotFound("host user".to_string())
        })?;
    let reviews = Review::find_for_listing(listing.id, &state.pool).await?;
    Ok(listing_view(listing, &host, &reviews))
}
