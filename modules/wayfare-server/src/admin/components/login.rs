use dioxus::prelude::*;

#[allow(non_snake_case)]
#[component]
fn LoginForm(error: Option<String>) -> Element {
    rsx! {
        head {
            meta { charset: "utf-8" }
            meta { name: "viewport", content: "width=device-width, initial-scale=1" }
            title { "Login — Wayfare Admin" }
            script { src: "https://cdn.tailwindcss.com" }
        }
        body { class: "flex items-center justify-center min-h-screen bg-gray-50 font-sans text-gray-900",
            div { class: "w-full max-w-sm bg-white border border-gray-200 rounded-lg p-8",
                h2 { class: "text-xl font-semibold mb-1", "Admin Login" }
                p { class: "text-gray-500 text-sm mb-4",
                    "Sign in to manage listings and reviews."
                }
                if let Some(err) = &error {
                    div { class: "bg-red-50 border border-red-200 text-red-800 text-sm px-3 py-2 rounded mb-4",
                        "{err}"
                    }
                }
                form { method: "POST", action: "/admin/login",
                    label { r#for: "username", class: "block text-sm text-gray-500 mb-1",
                        "Username"
                    }
                    input {
                        r#type: "text", name: "username", id: "username", required: true,
                        class: "w-full px-3 py-2.5 border border-gray-300 rounded text-base mb-3",
                        autofocus: true
                    }
                    label { r#for: "password", class: "block text-sm text-gray-500 mb-1",
                        "Password"
                    }
                    input {
                        r#type: "password", name: "password", id: "password", required: true,
                        class: "w-full px-3 py-2.5 border border-gray-300 rounded text-base mb-3"
                    }
                    button {
                        r#type: "submit",
                        class: "w-full py-2.5 bg-blue-600 text-white rounded text-sm font-medium cursor-pointer hover:bg-blue-800",
                        "Sign In"
                    }
                }
            }
        }
    }
}

pub fn render_login(error: Option<String>) -> String {
    super::render_dom(VirtualDom::new_with_props(LoginForm, LoginFormProps { error }))
}
