use dioxus::prelude::*;

struct NavItem {
    key: &'static str,
    label: &'static str,
    href: &'static str,
}

const NAV_ITEMS: &[NavItem] = &[
    NavItem { key: "dashboard", label: "Dashboard", href: "/admin" },
    NavItem { key: "listings", label: "Listings", href: "/admin/listings" },
    NavItem { key: "reviews", label: "Reviews", href: "/admin/reviews" },
];

/// Admin layout with sidebar navigation.
#[allow(non_snake_case)]
#[component]
pub fn Layout(title: String, active_page: String, children: Element) -> Element {
    let full_title = format!("{title} — Wayfare Admin");
    rsx! {
        head {
            meta { charset: "utf-8" }
            meta { name: "viewport", content: "width=device-width, initial-scale=1" }
            title { "{full_title}" }
            script { src: "https://cdn.tailwindcss.com" }
        }
        body { class: "flex min-h-screen bg-gray-50 font-sans text-gray-900",
            div { class: "w-56 bg-gray-900 text-white flex flex-col shrink-0 fixed inset-y-0 left-0 z-50",
                div { class: "px-5 py-4 text-lg font-semibold border-b border-gray-700",
                    "Wayfare"
                }
                nav { class: "flex flex-col py-3",
                    for item in NAV_ITEMS.iter() {
                        {
                            let class = if item.key == active_page {
                                "block px-5 py-2.5 text-sm text-white bg-blue-600"
                            } else {
                                "block px-5 py-2.5 text-sm text-gray-400 hover:text-white hover:bg-gray-700 transition-colors"
                            };
                            let href = item.href;
                            let label = item.label;
                            rsx! { a { href: href, class: class, "{label}" } }
                        }
                    }
                }
                form { method: "POST", action: "/admin/logout", class: "mt-auto px-5 py-4",
                    button {
                        r#type: "submit",
                        class: "text-sm text-gray-400 hover:text-white cursor-pointer",
                        "Log out"
                    }
                }
            }
            div { class: "ml-56 flex-1 min-w-0",
                {children}
            }
        }
    }
}

/// Prev/next pagination footer shared by the list screens.
#[allow(non_snake_case)]
#[component]
pub fn PagerNav(pager: super::Pager) -> Element {
    rsx! {
        div { class: "flex gap-3 items-center text-sm text-gray-500 mt-4",
            if pager.page > 1 {
                a {
                    href: pager.href_for(pager.page - 1),
                    class: "text-blue-600 hover:text-blue-800",
                    "Previous"
                }
            }
            span { "Page {pager.page} of {pager.page_count}" }
            if pager.page < pager.page_count {
                a {
                    href: pager.href_for(pager.page + 1),
                    class: "text-blue-600 hover:text-blue-800",
                    "Next"
                }
            }
        }
    }
}
