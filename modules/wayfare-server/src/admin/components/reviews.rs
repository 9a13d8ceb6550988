use dioxus::prelude::*;

use super::layout::{Layout, PagerNav};
use super::{Pager, ReviewFilterView, ReviewRow};

const INPUT_CLASS: &str = "px-2 py-1.5 border border-gray-300 rounded text-sm";

#[allow(non_snake_case)]
#[component]
fn ReviewsList(rows: Vec<ReviewRow>, filters: ReviewFilterView, pager: Pager, total: i64) -> Element {
    rsx! {
        Layout { title: "Reviews".to_string(), active_page: "reviews".to_string(),
            div { class: "max-w-5xl mx-auto p-6",
                div { class: "flex items-baseline justify-between mb-4",
                    h2 { class: "text-xl font-semibold", "Reviews" }
                    span { class: "text-sm text-gray-500", "{total} total" }
                }
                form { method: "GET", action: "/admin/reviews", class: "flex flex-wrap gap-2 items-end mb-4",
                    select { name: "rating", class: INPUT_CLASS,
                        option { value: "", selected: filters.rating.is_empty(), "Any rating" }
                        for r in 1..=5 {
                            option {
                                value: "{r}",
                                selected: filters.rating == r.to_string(),
                                "{r} stars"
                            }
                        }
                    }
                    input {
                        r#type: "search", name: "q", placeholder: "Search reviews",
                        value: filters.q.clone(), class: "{INPUT_CLASS} w-56"
                    }
                    button {
                        r#type: "submit",
                        class: "px-3 py-1.5 bg-blue-600 text-white rounded text-sm cursor-pointer hover:bg-blue-800",
                        "Filter"
                    }
                    a { href: "/admin/reviews", class: "text-sm text-gray-500 hover:text-gray-700", "Clear" }
                }
                if rows.is_empty() {
                    p { class: "text-gray-400 text-sm py-8 text-center", "No reviews match these filters." }
                } else {
                    table { class: "w-full bg-white border border-gray-200 rounded-lg text-sm",
                        thead {
                            tr { class: "text-left text-gray-500 border-b border-gray-200",
                                th { class: "px-4 py-2 font-medium", "Listing" }
                                th { class: "px-4 py-2 font-medium", "Reviewer" }
                                th { class: "px-4 py-2 font-medium", "Rating" }
                                th { class: "px-4 py-2 font-medium", "Comment" }
                                th { class: "px-4 py-2 font-medium", "Created" }
                                th { class: "px-4 py-2" }
                            }
                        }
                        tbody {
                            for row in rows.iter() {
                                tr { class: "border-b border-gray-100 last:border-0 hover:bg-gray-50",
                                    td { class: "px-4 py-2",
                                        a {
                                            href: "/admin/listings/{row.listing_id}",
                                            class: "text-blue-600 hover:text-blue-800",
                                            "{row.listing_title}"
                                        }
                                    }
                                    td { class: "px-4 py-2 text-gray-500", "{row.reviewer_username}" }
                                    td { class: "px-4 py-2", "{row.rating}/5" }
                                    td { class: "px-4 py-2 text-gray-500 max-w-xs truncate", "{row.comment}" }
                                    td { class: "px-4 py-2 text-gray-500", "{row.created_at}" }
                                    td { class: "px-4 py-2 text-right",
                                        form { method: "POST", action: "/admin/reviews/{row.id}/delete",
                                            button {
                                                r#type: "submit",
                                                class: "text-xs text-red-600 hover:text-red-800 cursor-pointer",
                                                "Delete"
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

pub fn render_reviews_list(
    rows: Vec<ReviewRow>,
    filters: ReviewFilterView,
    pager: Pager,
    total: i64,
) -> String {
    super::render_dom(VirtualDom::new_with_props(
        ReviewsList,
        ReviewsListProps { rows, filters, pager, total },
    ))
}
