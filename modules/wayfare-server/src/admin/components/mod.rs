pub mod dashboard;
pub mod layout;
pub mod listings;
pub mod login;
pub mod reviews;

pub use dashboard::render_dashboard;
pub use listings::{render_listing_edit, render_listings_list};
pub use login::render_login;
pub use reviews::render_reviews_list;

use dioxus::prelude::VirtualDom;

/// Rebuild a freshly constructed VirtualDom and serialize it into the
/// final HTML document.
fn render_dom(mut dom: VirtualDom) -> String {
    dom.rebuild_in_place();
    let mut html = String::from("<!DOCTYPE html><html lang=\"en\">");
    html.push_str(&dioxus::ssr::render(&dom));
    html.push_str("</html>");
    html
}

// --- View models ---

#[derive(Clone, PartialEq)]
pub struct ListingRow {
    pub id: String,
    pub title: String,
    pub type_label: String,
    pub location: String,
    pub price: String,
    pub max_guests: i32,
    pub host_username: String,
    pub is_active: bool,
    pub created_at: String,
}

#[derive(Clone, PartialEq)]
pub struct ListingEditView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub property_type: String,
    pub price: String,
    pub location: String,
    pub latitude: String,
    pub longitude: String,
    pub max_guests: String,
    pub bedrooms: String,
    pub bathrooms: String,
    pub amenities: String,
    pub host_username: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Clone, PartialEq)]
pub struct ReviewRow {
    pub id: String,
    pub listing_id: String,
    pub listing_title: String,
    pub reviewer_username: String,
    pub rating: i32,
    pub comment: String,
    pub created_at: String,
}

#[derive(Clone, PartialEq)]
pub struct DashboardView {
    pub total_listings: i64,
    pub active_listings: i64,
    pub total_reviews: i64,
    pub total_users: i64,
    pub by_type: Vec<TypeCountView>,
}

#[derive(Clone, PartialEq)]
pub struct TypeCountView {
    pub label: String,
    pub count: i64,
}

/// Current filter selections, echoed back into the filter form.
#[derive(Clone, PartialEq, Default)]
pub struct ListingFilterView {
    pub property_type: String,
    pub is_active: String,
    pub max_guests: String,
    pub created_after: String,
    pub q: String,
}

#[derive(Clone, PartialEq, Default)]
pub struct ReviewFilterView {
    pub rating: String,
    pub q: String,
}

/// Pagination state for list screens (25 rows per page).
#[derive(Clone, PartialEq)]
pub struct Pager {
    pub page: i64,
    pub page_count: i64,
    /// Query string of the active filters, without the page parameter.
    pub filter_query: String,
}

impl Pager {
    pub fn href_for(&self, page: i64) -> String {
        if self.filter_query.is_empty() {
            format!("?page={page}")
        } else {
            format!("?page={page}&{}", self.filter_query)
        }
    }
}
