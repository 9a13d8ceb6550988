pub mod listings;
pub mod users;

pub use listings::{
    Listing, ListingAdminRow, ListingFilters, ListingStats, NewListing, PropertyType,
    PropertyTypeCount, Review, ReviewAdminFilters, ReviewAdminRow, ReviewWithReviewer,
};
pub use users::User;
