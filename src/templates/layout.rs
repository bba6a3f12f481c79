use crate::session::{Toast, ToastLevel};
use maud::{html, Markup, DOCTYPE};

pub const APP_TITLE: &str = "Deena";

pub fn base_with_user(
    title: &str,
    content: Markup,
    username: Option<&str>,
    toasts: &[Toast],
) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - " (APP_TITLE) }

                link rel="icon" type="image/svg+xml" href="/static/logo.svg";

                // Tailwind CSS CDN
                script src="https://cdn.tailwindcss.com" {}

                // Font Awesome
                link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.5.1/css/all.min.css"
                    integrity="sha512-DTOQO9RWCH3ppGqcWaEA1BIZOC6xxalwEsw9c2QQeAIftl+Vegovlnee1c9QX4TctnWMn13TZye+giMm8e2LwA=="
                    crossorigin="anonymous" referrerpolicy="no-referrer";
            }
            body class="min-h-screen flex flex-col bg-slate-50 text-slate-800" {
                (navbar(username))
                (toast_stack(toasts))
                main class="flex-1 py-8 px-4" {
                    (content)
                }
                (footer())
            }
        }
    }
}

fn navbar(username: Option<&str>) -> Markup {
    html! {
        nav class="bg-white border-b border-slate-200" {
            div class="max-w-5xl mx-auto px-4 py-3 flex items-center justify-between" {
                a href="/" class="flex items-center gap-2" {
                    img src="/static/logo.svg" alt="logo" class="h-8 w-8";
                    span class="text-xl font-semibold" { (APP_TITLE) }
                }

                @if let Some(user) = username {
                    div class="flex items-center gap-3" {
                        span class="text-sm font-medium" {
                            i class="fa-solid fa-user mr-1" {}
                            (user)
                        }
                        form action="/logout" method="post" {
                            button type="submit" class="text-sm text-slate-500 hover:text-slate-800" {
                                i class="fa-solid fa-right-from-bracket mr-1" {}
                                "Logout"
                            }
                        }
                    }
                }
            }
        }
    }
}

fn toast_stack(toasts: &[Toast]) -> Markup {
    html! {
        @if !toasts.is_empty() {
            div class="fixed top-4 right-4 space-y-2 z-50" {
                @for toast in toasts {
                    @let (class, icon) = toast_style(toast.level);
                    div class={ "toast border rounded-lg px-4 py-2 shadow " (class) } role="status" {
                        i class={ "fa-solid mr-2 " (icon) } {}
                        (toast.message)
                    }
                }
            }
        }
    }
}

fn toast_style(level: ToastLevel) -> (&'static str, &'static str) {
    match level {
        ToastLevel::Success => ("bg-green-50 border-green-300 text-green-800", "fa-circle-check"),
        ToastLevel::Info => ("bg-blue-50 border-blue-300 text-blue-800", "fa-circle-info"),
        ToastLevel::Error => ("bg-red-50 border-red-300 text-red-800", "fa-circle-xmark"),
    }
}

fn footer() -> Markup {
    html! {
        footer class="border-t border-slate-200 py-4 text-center text-sm text-slate-500" {
            "© " (APP_TITLE)
        }
    }
}
