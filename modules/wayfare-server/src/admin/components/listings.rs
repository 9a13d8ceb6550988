use dioxus::prelude::*;
use wayfare_domains::PropertyType;

use super::layout::{Layout, PagerNav};
use super::{ListingEditView, ListingFilterView, ListingRow, Pager};

const INPUT_CLASS: &str = "px-2 py-1.5 border border-gray-300 rounded text-sm";
const FIELD_CLASS: &str = "w-full px-3 py-2 border border-gray-300 rounded text-sm";
const LABEL_CLASS: &str = "block text-sm text-gray-500 mb-1 mt-3";

#[allow(non_snake_case)]
#[component]
fn ListingsList(rows: Vec<ListingRow>, filters: ListingFilterView, pager: Pager, total: i64) -> Element {
    rsx! {
        Layout { title: "Listings".to_string(), active_page: "listings".to_string(),
            div { class: "max-w-6xl mx-auto p-6",
                div { class: "flex items-baseline justify-between mb-4",
                    h2 { class: "text-xl font-semibold", "Listings" }
                    span { class: "text-sm text-gray-500", "{total} total" }
                }
                form { method: "GET", action: "/admin/listings", class: "flex flex-wrap gap-2 items-end mb-4",
                    select { name: "property_type", class: INPUT_CLASS,
                        option { value: "", selected: filters.property_type.is_empty(), "All types" }
                        for pt in PropertyType::ALL.iter() {
                            option {
                                value: pt.as_str(),
                                selected: filters.property_type == pt.as_str(),
                                "{pt}"
                            }
                        }
                    }
                    select { name: "is_active", class: INPUT_CLASS,
                        option { value: "", selected: filters.is_active.is_empty(), "Any status" }
                        option { value: "true", selected: filters.is_active == "true", "Active" }
                        option { value: "false", selected: filters.is_active == "false", "Inactive" }
                    }
                    input {
                        r#type: "number", name: "max_guests", min: "1",
                        placeholder: "Min guests", value: filters.max_guests.clone(),
                        class: "{INPUT_CLASS} w-28"
                    }
                    input {
                        r#type: "date", name: "created_after",
                        value: filters.created_after.clone(), class: INPUT_CLASS
                    }
                    input {
                        r#type: "search", name: "q", placeholder: "Search listings",
                        value: filters.q.clone(), class: "{INPUT_CLASS} w-56"
                    }
                    button {
                        r#type: "submit",
                        class: "px-3 py-1.5 bg-blue-600 text-white rounded text-sm cursor-pointer hover:bg-blue-800",
                        "Filter"
                    }
                    a { href: "/admin/listings", class: "text-sm text-gray-500 hover:text-gray-700", "Clear" }
                }
                if rows.is_empty() {
                    p { class: "text-gray-400 text-sm py-8 text-center", "No listings match these filters." }
                } else {
                    table { class: "w-full bg-white border border-gray-200 rounded-lg text-sm",
                        thead {
                            tr { class: "text-left text-gray-500 border-b border-gray-200",
                                th { class: "px-4 py-2 font-medium", "Title" }
                                th { class: "px-4 py-2 font-medium", "Type" }
                                th { class: "px-4 py-2 font-medium", "Location" }
                                th { class: "px-4 py-2 font-medium text-right", "Price/night" }
                                th { class: "px-4 py-2 font-medium text-right", "Guests" }
                                th { class: "px-4 py-2 font-medium", "Host" }
                                th { class: "px-4 py-2 font-medium", "Created" }
                                th { class: "px-4 py-2 font-medium", "Active" }
                            }
                        }
                        tbody {
                            for row in rows.iter() {
                                tr { class: "border-b border-gray-100 last:border-0 hover:bg-gray-50",
                                    td { class: "px-4 py-2",
                                        a {
                                            href: "/admin/listings/{row.id}",
                                            class: "text-blue-600 hover:text-blue-800",
                                            "{row.title}"
                                        }
                                    }
                                    td { class: "px-4 py-2 capitalize", "{row.type_label}" }
                                    td { class: "px-4 py-2 text-gray-500", "{row.location}" }
                                    td { class: "px-4 py-2 text-right", "{row.price}" }
                                    td { class: "px-4 py-2 text-right", "{row.max_guests}" }
                                    td { class: "px-4 py-2 text-gray-500", "{row.host_username}" }
                                    td { class: "px-4 py-2 text-gray-500", "{row.created_at}" }
                                    td { class: "px-4 py-2",
                                        form { method: "POST", action: "/admin/listings/{row.id}/active",
                                            input {
                                                r#type: "hidden", name: "is_active",
                                                value: if row.is_active { "false" } else { "true" }
                                            }
                                            if row.is_active {
                                                button {
                                                    r#type: "submit",
                                                    class: "px-2 py-0.5 bg-green-100 text-green-800 rounded text-xs cursor-pointer",
                                                    "Active"
                                                }
                                            } else {
                                                button {
                                                    r#type: "submit",
                                                    class: "px-2 py-0.5 bg-gray-100 text-gray-500 rounded text-xs cursor-pointer",
                                                    "Inactive"
                                                }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                    PagerNav { pager }
                }
            }
        }
    }
}

#[allow(non_snake_case)]
#[component]
fn ListingEdit(listing: ListingEditView, error: Option<String>) -> Element {
    rsx! {
        Layout { title: "Edit Listing".to_string(), active_page: "listings".to_string(),
            div { class: "max-w-2xl mx-auto p-6",
                a { href: "/admin/listings", class: "text-sm text-blue-600 hover:text-blue-800", "← Listings" }
                h2 { class: "text-xl font-semibold mt-2 mb-1", "{listing.title}" }
                p { class: "text-sm text-gray-500 mb-4",
                    "Hosted by {listing.host_username} · created {listing.created_at} · updated {listing.updated_at}"
                }
                if let Some(err) = &error {
                    div { class: "bg-red-50 border border-red-200 text-red-800 text-sm px-3 py-2 rounded mb-4",
                        "{err}"
                    }
                }
                form { method: "POST", action: "/admin/listings/{listing.id}",
                    class: "bg-white border border-gray-200 rounded-lg p-6",
                    label { r#for: "title", class: LABEL_CLASS, "Title" }
                    input {
                        r#type: "text", name: "title", id: "title", required: true,
                        maxlength: "200", value: listing.title.clone(), class: FIELD_CLASS
                    }
                    label { r#for: "description", class: LABEL_CLASS, "Description" }
                    textarea {
                        name: "description", id: "description", rows: "4", class: FIELD_CLASS,
                        "{listing.description}"
                    }
                    div { class: "grid grid-cols-2 gap-4",
                        div {
                            label { r#for: "property_type", class: LABEL_CLASS, "Property type" }
                            select { name: "property_type", id: "property_type", class: FIELD_CLASS,
                                for pt in PropertyType::ALL.iter() {
                                    option {
                                        value: pt.as_str(),
                                        selected: listing.property_type == pt.as_str(),
                                        "{pt}"
                                    }
                                }
                            }
                        }
                        div {
                            label { r#for: "price_per_night", class: LABEL_CLASS, "Price per night" }
                            input {
                                r#type: "text", name: "price_per_night", id: "price_per_night",
                                required: true, value: listing.price.clone(), class: FIELD_CLASS
                            }
                        }
                    }
                    label { r#for: "location", class: LABEL_CLASS, "Location" }
                    input {
                        r#type: "text", name: "location", id: "location", required: true,
                        maxlength: "200", value: listing.location.clone(), class: FIELD_CLASS
                    }
                    div { class: "grid grid-cols-2 gap-4",
                        div {
                            label { r#for: "latitude", class: LABEL_CLASS, "Latitude" }
                            input {
                                r#type: "text", name: "latitude", id: "latitude",
                                value: listing.latitude.clone(), class: FIELD_CLASS
                            }
                        }
                        div {
                            label { r#for: "longitude", class: LABEL_CLASS, "Longitude" }
                            input {
                                r#type: "text", name: "longitude", id: "longitude",
                                value: listing.longitude.clone(), class: FIELD_CLASS
                            }
                        }
                    }
                    div { class: "grid grid-cols-3 gap-4",
                        div {
                            label { r#for: "max_guests", class: LABEL_CLASS, "Max guests" }
                            input {
                                r#type: "number", name: "max_guests", id: "max_guests", min: "0",
                                required: true, value: listing.max_guests.clone(), class: FIELD_CLASS
                            }
                        }
                        div {
                            label { r#for: "bedrooms", class: LABEL_CLASS, "Bedrooms" }
                            input {
                                r#type: "number", name: "bedrooms", id: "bedrooms", min: "0",
                                required: true, value: listing.bedrooms.clone(), class: FIELD_CLASS
                            }
                        }
                        div {
                            label { r#for: "bathrooms", class: LABEL_CLASS, "Bathrooms" }
                            input {
                                r#type: "number", name: "bathrooms", id: "bathrooms", min: "0",
                                required: true, value: listing.bathrooms.clone(), class: FIELD_CLASS
                            }
                        }
                    }
                    label { r#for: "amenities", class: LABEL_CLASS, "Amenities" }
                    textarea {
                        name: "amenities", id: "amenities", rows: "2", class: FIELD_CLASS,
                        "{listing.amenities}"
                    }
                    label { class: "flex items-center gap-2 mt-4 text-sm",
                        input {
                            r#type: "checkbox", name: "is_active", value: "true",
                            checked: listing.is_active
                        }
                        "Active"
                    }
                    button {
                        r#type: "submit",
                        class: "mt-5 px-4 py-2 bg-blue-600 text-white rounded text-sm font-medium cursor-pointer hover:bg-blue-800",
                        "Save changes"
                    }
                }
            }
        }
    }
}

pub fn render_listings_list(
    rows: Vec<ListingRow>,
    filters: ListingFilterView,
    pager: Pager,
    total: i64,
) -> String {
    super::render_dom(VirtualDom::new_with_props(
        ListingsList,
        ListingsListProps { rows, filters, pager, total },
    ))
}

pub fn render_listing_edit(listing: ListingEditView, error: Option<String>) -> String {
    super::render_dom(VirtualDom::new_with_props(
        ListingEdit,
        ListingEditProps { listing, error },
    ))
}
