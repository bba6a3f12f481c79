use crate::models::SessionUser;
use maud::{html, Markup};

pub fn home(user: &SessionUser) -> Markup {
    html! {
        div class="max-w-3xl mx-auto text-center" {
            @if let Some(avatar) = &user.avatar {
                img src=(avatar) alt="avatar" class="h-20 w-20 rounded-full mx-auto mb-4";
            }
            h1 class="text-4xl font-bold mb-2" {
                "Welcome, " (user.display_name())
            }
            @if let Some(email) = &user.email {
                p class="text-slate-500 mb-6" { (email) }
            }

            div class="grid grid-cols-1 md:grid-cols-2 gap-6 text-left mt-8" {
                (detail_card("fa-id-badge", "User ID", user.userid.as_deref()))
                (detail_card("fa-shield-halved", "Access", user.access.as_deref()))
            }
        }
    }
}

fn detail_card(icon: &str, label: &str, value: Option<&str>) -> Markup {
    html! {
        div class="bg-white rounded-lg p-6 border border-slate-200" {
            div class="text-sm text-slate-500 mb-1" {
                i class={ "fa-solid mr-2 " (icon) } {}
                (label)
            }
            div class="text-xl font-semibold" { (value.unwrap_or("-")) }
        }
    }
}
