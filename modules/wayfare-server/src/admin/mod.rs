//! Server-rendered admin screens for listings and reviews.

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{ConnectInfo, Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use wayfare_core::WayfareError;
use wayfare_domains::{
    Listing, ListingAdminRow, ListingFilters, ListingStats, NewListing, PropertyType, Review,
    ReviewAdminFilters, ReviewAdminRow,
};

use crate::auth::{self, AdminSession};
use crate::AppState;

pub mod components;

use components::{
    DashboardView, ListingEditView, ListingFilterView, ListingRow, Pager, ReviewFilterView,
    ReviewRow, TypeCountView,
};

/// Rows per page on the admin list screens.
const PER_PAGE: i64 = 25;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

// --- Login ---

pub async fn login_page() -> Html<String> {
    Html(components::render_login(None))
}

#[derive(Deserialize)]
pub struct LoginForm {
    username: String,
    password: String,
}

pub async fn login_submit(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Form(form): Form<LoginForm>,
) -> Response {
    {
        let mut limiter = state.rate_limiter.lock().await;
        if !auth::allow_attempt(
            &mut limiter,
            addr.ip(),
            Instant::now(),
            auth::AUTH_RATE_LIMIT_PER_HOUR,
        ) {
            warn!(ip = %addr.ip(), "admin login rate limited");
            return (
                StatusCode::TOO_MANY_REQUESTS,
                Html(components::render_login(Some(
                    "Too many login attempts. Try again later.".to_string(),
                ))),
            )
                .into_response();
        }
    }

    let username_ok = auth::credential_matches(&form.username, &state.config.admin_username);
    let password_ok = auth::credential_matches(&form.password, &state.config.admin_password);

    if username_ok && password_ok {
        info!(username = %form.username, "admin login");
        let cookie = auth::session_cookie(&form.username, state.config.session_secret());
        (
            [(header::SET_COOKIE, cookie)],
            Redirect::to("/admin"),
        )
            .into_response()
    } else {
        warn!(ip = %addr.ip(), "admin login failed");
        (
            StatusCode::UNAUTHORIZED,
            Html(components::render_login(Some(
                "Invalid username or password.".to_string(),
            ))),
        )
            .into_response()
    }
}

pub async fn logout(_session: AdminSession) -> Response {
    (
        [(header::SET_COOKIE, auth::clear_session_cookie())],
        Redirect::to("/admin/login"),
    )
        .into_response()
}

// --- Dashboard ---

pub async fn dashboard(State(state): State<Arc<AppState>>, _session: AdminSession) -> Response {
    match ListingStats::compute(&state.pool).await {
        Ok(stats) => {
            let view = DashboardView {
                total_listings: stats.total_listings,
                active_listings: stats.active_listings,
                total_reviews: stats.total_reviews,
                total_users: stats.total_users,
                by_type: stats
                    .listings_by_type
                    .into_iter()
                    .map(|row| TypeCountView {
                        label: row.property_type.to_string(),
                        count: row.count,
                    })
                    .collect(),
            };
            Html(components::render_dashboard(view)).into_response()
        }
        Err(e) => server_error(e),
    }
}

// --- Listings ---

#[derive(Deserialize, Default)]
pub struct AdminListingsQuery {
    property_type: Option<String>,
    is_active: Option<String>,
    max_guests: Option<String>,
    created_after: Option<String>,
    q: Option<String>,
    page: Option<i64>,
}

pub async fn listings_page(
    State(state): State<Arc<AppState>>,
    _session: AdminSession,
    Query(query): Query<AdminListingsQuery>,
) -> Response {
    let page = query.page.unwrap_or(1).max(1);
    let filters = listing_filters_from_query(&query, page);
    let filter_view = ListingFilterView {
        property_type: query.property_type.clone().unwrap_or_default(),
        is_active: query.is_active.clone().unwrap_or_default(),
        max_guests: query.max_guests.clone().unwrap_or_default(),
        created_after: query.created_after.clone().unwrap_or_default(),
        q: query.q.clone().unwrap_or_default(),
    };

    let rows = match ListingAdminRow::find_filtered(&filters, &state.pool).await {
        Ok(rows) => rows,
        Err(e) => return server_error(e),
    };
    let total = match Listing::count_filtered(&filters, &state.pool).await {
        Ok(total) => total,
        Err(e) => return server_error(e),
    };

    let pager = Pager {
        page,
        page_count: page_count(total, PER_PAGE),
        filter_query: listing_filter_query(&filter_view),
    };
    let rows = rows.into_iter().map(listing_row).collect();

    Html(components::render_listings_list(rows, filter_view, pager, total)).into_response()
}

pub async fn listing_edit_page(
    State(state): State<Arc<AppState>>,
    _session: AdminSession,
    Path(id): Path<Uuid>,
) -> Response {
    match load_edit_view(id, &state).await {
        Ok(view) => Html(components::render_listing_edit(view, None)).into_response(),
        Err(WayfareError::NotFound(_)) => not_found(),
        Err(e) => server_error(e),
    }
}

#[derive(Deserialize)]
pub struct ListingEditForm {
    title: String,
    description: String,
    property_type: String,
    price_per_night: String,
    location: String,
    #[serde(default)]
    latitude: String,
    #[serde(default)]
    longitude: String,
    max_guests: String,
    bedrooms: String,
    bathrooms: String,
    #[serde(default)]
    amenities: String,
    /// Checkbox; absent when unchecked.
    is_active: Option<String>,
}

pub async fn listing_edit_submit(
    State(state): State<Arc<AppState>>,
    _session: AdminSession,
    Path(id): Path<Uuid>,
    Form(form): Form<ListingEditForm>,
) -> Response {
    let input = match parse_edit_form(&form) {
        Ok(input) => input,
        Err(e) => {
            // Re-render the form with the error banner and the stored row.
            return match load_edit_view(id, &state).await {
                Ok(view) => Html(components::render_listing_edit(view, Some(e.to_string())))
                    .into_response(),
                Err(WayfareError::NotFound(_)) => not_found(),
                Err(e) => server_error(e),
            };
        }
    };

    let is_active = form.is_active.is_some();
    match Listing::update(id, &input, Some(is_active), &state.pool).await {
        Ok(_) => {
            info!(listing_id = %id, "listing updated via admin");
            Redirect::to("/admin/listings").into_response()
        }
        Err(WayfareError::NotFound(_)) => not_found(),
        Err(e @ WayfareError::Validation { .. }) => match load_edit_view(id, &state).await {
            Ok(view) => {
                Html(components::render_listing_edit(view, Some(e.to_string()))).into_response()
            }
            Err(e) => server_error(e),
        },
        Err(e) => server_error(e),
    }
}

#[derive(Deserialize)]
pub struct ToggleActiveForm {
    is_active: String,
}

pub async fn listing_toggle_active(
    State(state): State<Arc<AppState>>,
    _session: AdminSession,
    Path(id): Path<Uuid>,
    Form(form): Form<ToggleActiveForm>,
) -> Response {
    let is_active = form.is_active == "true";
    match Listing::set_active(id, is_active, &state.pool).await {
        Ok(()) => Redirect::to("/admin/listings").into_response(),
        Err(WayfareError::NotFound(_)) => not_found(),
        Err(e) => server_error(e),
    }
}

// --- Reviews ---

#[derive(Deserialize, Default)]
pub struct AdminReviewsQuery {
    rating: Option<String>,
    q: Option<String>,
    page: Option<i64>,
}

pub async fn reviews_page(
    State(state): State<Arc<AppState>>,
    _session: AdminSession,
    Query(query): Query<AdminReviewsQuery>,
) -> Response {
    let page = query.page.unwrap_or(1).max(1);
    let filters = ReviewAdminFilters {
        rating: query.rating.as_deref().and_then(|s| s.parse().ok()),
        search: query.q.clone().filter(|s| !s.trim().is_empty()),
        limit: Some(PER_PAGE),
        offset: Some((page - 1) * PER_PAGE),
    };
    let filter_view = ReviewFilterView {
        rating: query.rating.clone().unwrap_or_default(),
        q: query.q.clone().unwrap_or_default(),
    };

    let rows = match ReviewAdminRow::find_filtered(&filters, &state.pool).await {
        Ok(rows) => rows,
        Err(e) => return server_error(e),
    };
    let total = match ReviewAdminRow::count_filtered(&filters, &state.pool).await {
        Ok(total) => total,
        Err(e) => return server_error(e),
    };

    let pager = Pager {
        page,
        page_count: page_count(total, PER_PAGE),
        filter_query: review_filter_query(&filter_view),
    };
    let rows = rows.into_iter().map(review_row).collect();

    Html(components::render_reviews_list(rows, filter_view, pager, total)).into_response()
}

pub async fn review_delete(
    State(state): State<Arc<AppState>>,
    _session: AdminSession,
    Path(id): Path<Uuid>,
) -> Response {
    match Review::delete(id, &state.pool).await {
        Ok(()) => {
            info!(review_id = %id, "review deleted via admin");
            Redirect::to("/admin/reviews").into_response()
        }
        Err(WayfareError::NotFound(_)) => not_found(),
        Err(e) => server_error(e),
    }
}

// --- Helpers ---

fn listing_filters_from_query(query: &AdminListingsQuery, page: i64) -> ListingFilters {
    ListingFilters {
        property_type: query
            .property_type
            .as_deref()
            .and_then(|s| PropertyType::from_str(s).ok()),
        is_active: query.is_active.as_deref().and_then(|s| match s {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }),
        max_guests: query.max_guests.as_deref().and_then(|s| s.parse().ok()),
        created_after: query.created_after.as_deref().and_then(parse_date),
        search: query.q.clone().filter(|s| !s.trim().is_empty()),
        limit: Some(PER_PAGE),
        offset: Some((page - 1) * PER_PAGE),
    }
}

/// Parse a `YYYY-MM-DD` date as midnight UTC.
fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}

fn parse_edit_form(form: &ListingEditForm) -> Result<NewListing, WayfareError> {
    let property_type = PropertyType::from_str(&form.property_type)?;
    let price_per_night = Decimal::from_str(form.price_per_night.trim())
        .map_err(|_| WayfareError::validation("price_per_night", "must be a decimal number"))?;
    let latitude = parse_optional_decimal("latitude", &form.latitude)?;
    let longitude = parse_optional_decimal("longitude", &form.longitude)?;
    let max_guests = parse_count("max_guests", &form.max_guests)?;
    let bedrooms = parse_count("bedrooms", &form.bedrooms)?;
    let bathrooms = parse_count("bathrooms", &form.bathrooms)?;

    Ok(NewListing {
        title: form.title.trim().to_string(),
        description: form.description.clone(),
        property_type,
        price_per_night,
        location: form.location.trim().to_string(),
        latitude,
        longitude,
        max_guests,
        bedrooms,
        bathrooms,
        amenities: form.amenities.clone(),
    })
}

fn parse_optional_decimal(field: &str, value: &str) -> Result<Option<Decimal>, WayfareError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    Decimal::from_str(trimmed)
        .map(Some)
        .map_err(|_| WayfareError::validation(field, "must be a decimal number"))
}

fn parse_count(field: &str, value: &str) -> Result<i32, WayfareError> {
    value
        .trim()
        .parse()
        .map_err(|_| WayfareError::validation(field, "must be a whole number"))
}

fn page_count(total: i64, per_page: i64) -> i64 {
    if total <= 0 {
        1
    } else {
        (total + per_page - 1) / per_page
    }
}

fn listing_row(row: ListingAdminRow) -> ListingRow {
    ListingRow {
        id: row.id.to_string(),
        title: row.title,
        type_label: row.property_type.to_string(),
        location: row.location,
        price: row.price_per_night.to_string(),
        max_guests: row.max_guests,
        host_username: row.host_username,
        is_active: row.is_active,
        created_at: row.created_at.format(DATE_FORMAT).to_string(),
    }
}

fn review_row(row: ReviewAdminRow) -> ReviewRow {
    ReviewRow {
        id: row.id.to_string(),
        listing_id: row.listing_id.to_string(),
        listing_title: row.listing_title,
        reviewer_username: row.reviewer_username,
        rating: row.rating,
        comment: row.comment,
        created_at: row.created_at.format(DATE_FORMAT).to_string(),
    }
}

async fn load_edit_view(id: Uuid, state: &AppState) -> Result<ListingEditView, WayfareError> {
    let listing = Listing::find_by_id(id, &state.pool)
        .await?
        .ok_or_else(|| WayfareError::NotFound(format!("listing {id}")))?;
    let host = wayfare_domains::User::find_by_id(listing.host_id, &state.pool)
        .await?
        .ok_or_else(|| WayfareError::NotFound("host user".to_string()))?;

    Ok(ListingEditView {
        id: listing.id.to_string(),
        title: listing.title,
        description: listing.description,
        property_type: listing.property_type.as_str().to_string(),
        price: listing.price_per_night.to_string(),
        location: listing.location,
        latitude: listing.latitude.map(|d| d.to_string()).unwrap_or_default(),
        longitude: listing.longitude.map(|d| d.to_string()).unwrap_or_default(),
        max_guests: listing.max_guests.to_string(),
        bedrooms: listing.bedrooms.to_string(),
        bathrooms: listing.bathrooms.to_string(),
        amenities: listing.amenities,
        host_username: host.username,
        is_active: listing.is_active,
        created_at: listing.created_at.format(DATE_FORMAT).to_string(),
        updated_at: listing.updated_at.format(DATE_FORMAT).to_string(),
    })
}

/// Rebuild the filter query string so pagination links keep the filters.
fn listing_filter_query(filters: &ListingFilterView) -> String {
    let mut parts = Vec::new();
    push_param(&mut parts, "property_type", &filters.property_type);
    push_param(&mut parts, "is_active", &filters.is_active);
    push_param(&mut parts, "max_guests", &filters.max_guests);
    push_param(&mut parts, "created_after", &filters.created_after);
    push_param(&mut parts, "q", &filters.q);
    parts.join("&")
}

fn review_filter_query(filters: &ReviewFilterView) -> String {
    let mut parts = Vec::new();
    push_param(&mut parts, "rating", &filters.rating);
    push_param(&mut parts, "q", &filters.q);
    parts.join("&")
}

fn push_param(parts: &mut Vec<String>, name: &str, value: &str) {
    if !value.is_empty() {
        parts.push(format!("{name}={}", urlencoding::encode(value)));
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Html("<h1>Not Found</h1>".to_string())).into_response()
}

fn server_error(err: WayfareError) -> Response {
    warn!(error = %err, "admin screen failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html("<h1>Something went wrong</h1>".to_string()),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edit_form() -> ListingEditForm {
        ListingEditForm {
            title: "  Beach Villa  ".to_string(),
            description: "Steps from the sand".to_string(),
            property_type: "villa".to_string(),
            price_per_night: "240.00".to_string(),
            location: "Mombasa".to_string(),
            latitude: "".to_string(),
            longitude: "".to_string(),
            max_guests: "6".to_string(),
            bedrooms: "3".to_string(),
            bathrooms: "2".to_string(),
            amenities: "wifi,pool".to_string(),
            is_active: Some("true".to_string()),
        }
    }

    #[test]
    fn edit_form_parses() {
        let input = parse_edit_form(&edit_form()).unwrap();
        assert_eq!(input.title, "Beach Villa");
        assert_eq!(input.property_type, PropertyType::Villa);
        assert_eq!(input.price_per_night, Decimal::new(24000, 2));
        assert_eq!(input.latitude, None);
        assert_eq!(input.max_guests, 6);
    }

    #[test]
    fn edit_form_rejects_bad_price() {
        let mut form = edit_form();
        form.price_per_night = "lots".to_string();
        let err = parse_edit_form(&form).unwrap_err();
        assert!(matches!(err, WayfareError::Validation { ref field, .. } if field == "price_per_night"));
    }

    #[test]
    fn edit_form_rejects_bad_property_type() {
        let mut form = edit_form();
        form.property_type = "castle".to_string();
        assert!(parse_edit_form(&form).is_err());
    }

    #[test]
    fn edit_form_parses_coordinates() {
        let mut form = edit_form();
        form.latitude = "-4.043740".to_string();
        form.longitude = "39.668206".to_string();
        let input = parse_edit_form(&form).unwrap();
        assert_eq!(input.latitude, Some(Decimal::from_str("-4.043740").unwrap()));
        assert_eq!(input.longitude, Some(Decimal::from_str("39.668206").unwrap()));
    }

    #[test]
    fn page_count_math() {
        assert_eq!(page_count(0, 25), 1);
        assert_eq!(page_count(1, 25), 1);
        assert_eq!(page_count(25, 25), 1);
        assert_eq!(page_count(26, 25), 2);
        assert_eq!(page_count(51, 25), 3);
    }

    #[test]
    fn filter_query_skips_empty_fields() {
        let filters = ListingFilterView {
            property_type: "villa".to_string(),
            q: "beach house".to_string(),
            ..Default::default()
        };
        assert_eq!(
            listing_filter_query(&filters),
            "property_type=villa&q=beach%20house"
        );
        assert_eq!(listing_filter_query(&ListingFilterView::default()), "");
    }

    #[test]
    fn pager_hrefs_keep_filters() {
        let pager = Pager {
            page: 2,
            page_count: 4,
            filter_query: "rating=5".to_string(),
        };
        assert_eq!(pager.href_for(3), "?page=3&rating=5");

        let bare = Pager {
            page: 1,
            page_count: 2,
            filter_query: String::new(),
        };
        assert_eq!(bare.href_for(2), "?page=2");
    }

    #[test]
    fn date_filter_parses_midnight_utc() {
        let parsed = parse_date("2026-05-01").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2026-05-01T00:00:00+00:00");
        assert!(parse_date("not-a-date").is_none());
    }
}
