use dioxus::prelude::*;

use super::layout::Layout;
use super::DashboardView;

#[allow(non_snake_case)]
#[component]
fn StatCard(label: String, value: i64) -> Element {
    rsx! {
        div { class: "bg-white border border-gray-200 rounded-lg p-5",
            div { class: "text-3xl font-semibold", "{value}" }
            div { class: "text-sm text-gray-500 mt-1", "{label}" }
        }
    }
}

#[allow(non_snake_case)]
#[component]
fn Dashboard(data: DashboardView) -> Element {
    rsx! {
        Layout { title: "Dashboard".to_string(), active_page: "dashboard".to_string(),
            div { class: "max-w-4xl mx-auto p-6",
                h2 { class: "text-xl font-semibold mb-4", "Overview" }
                div { class: "grid grid-cols-2 md:grid-cols-4 gap-4",
                    StatCard { label: "Listings".to_string(), value: data.total_listings }
                    StatCard { label: "Active listings".to_string(), value: data.active_listings }
                    StatCard { label: "Reviews".to_string(), value: data.total_reviews }
                    StatCard { label: "Users".to_string(), value: data.total_users }
                }
                h3 { class: "text-base font-semibold mt-8 mb-3", "Listings by property type" }
                if data.by_type.is_empty() {
                    p { class: "text-gray-400 text-sm", "No listings yet." }
                }
                table { class: "w-full bg-white border border-gray-200 rounded-lg text-sm",
                    tbody {
                        for row in data.by_type.iter() {
                            tr { class: "border-b border-gray-100 last:border-0",
                                td { class: "px-4 py-2 capitalize", "{row.label}" }
                                td { class: "px-4 py-2 text-right text-gray-500", "{row.count}" }
                            }
                        }
                    }
                }
            }
        }
    }
}

pub fn render_dashboard(data: DashboardView) -> String {
    super::render_dom(VirtualDom::new_with_props(Dashboard, DashboardProps { data }))
}
