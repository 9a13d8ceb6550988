pub mod models;

pub use models::listing::{
    Listing, ListingAdminRow, ListingFilters, ListingStats, NewListing, PropertyType,
    PropertyTypeCount,
};
pub use models::review::{Review, ReviewAdminFilters, ReviewAdminRow, ReviewWithReviewer};
