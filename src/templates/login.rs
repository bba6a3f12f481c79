use super::APP_TITLE;
use crate::{
    form::{FieldSpec, LOGIN_FIELDS, REGISTRATION_FIELDS},
    login::LoginView,
    models::{FormMode, UserType},
    redirect::redirect_query,
};
use maud::{html, Markup, PreEscaped};
use std::collections::HashMap;

const INPUT_CLASS: &str = "border border-slate-300 text-sm rounded-lg focus:ring-blue-500 focus:border-blue-500 block w-full p-2.5";

/// Everything the login page needs to render one response.
pub struct LoginPage<'a> {
    pub view: &'a LoginView,
    pub redirect: Option<&'a str>,
    /// Non-secret values to put back into the inputs
    pub values: &'a HashMap<&'static str, String>,
    /// Required fields the last attempt left empty
    pub missing: &'a [&'static str],
}

impl LoginPage<'_> {
    fn value(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }

    fn is_missing(&self, name: &str) -> bool {
        self.missing.iter().any(|m| *m == name)
    }

    fn href(&self, path: &str, extra: Option<&str>) -> String {
        let query: Vec<String> = extra
            .map(str::to_string)
            .into_iter()
            .chain(Some(redirect_query(self.redirect)).filter(|q| !q.is_empty()))
            .collect();
        if query.is_empty() {
            path.to_string()
        } else {
            format!("{}?{}", path, query.join("&"))
        }
    }
}

pub fn login(page: &LoginPage) -> Markup {
    let mode = page.view.mode();

    html! {
        div class="max-w-xl mx-auto" {
            div class="text-center mb-6" {
                img src="/static/logo.svg" alt="logo" class="h-12 w-12 mx-auto mb-2";
                h1 class="text-3xl font-bold" { (APP_TITLE) }
                p class="text-slate-500" { "Campus account portal" }
            }

            (tabs(page))

            form action=(page.href("/login", None)) method="post" id="login-form"
                class="bg-white rounded-lg p-8 border border-slate-200 space-y-6" {

                input type="hidden" name="type" value=(mode.as_str());

                @if page.view.visible_error().is_some() {
                    (error_banner(mode))
                }

                @match mode {
                    FormMode::Login => { (login_fields(page)) }
                    FormMode::Registration => { (registration_fields(page)) }
                }

                div {
                    button type="submit" id="submit-button"
                        class="w-full text-white bg-blue-600 hover:bg-blue-700 rounded-lg px-5 py-2.5 font-medium disabled:opacity-50" {
                        @match mode {
                            FormMode::Login => {
                                i class="fa-solid fa-right-to-bracket mr-2" {}
                                "Login"
                            }
                            FormMode::Registration => {
                                i class="fa-solid fa-user-plus mr-2" {}
                                "Register Account"
                            }
                        }
                    }
                }
            }
        }

        // One submission at a time
        script {
            (PreEscaped(r#"
            document.getElementById('login-form').addEventListener('submit', function() {
                document.getElementById('submit-button').disabled = true;
            });
            "#))
        }
    }
}

fn tabs(page: &LoginPage) -> Markup {
    let active = page.view.mode();
    html! {
        div class="flex justify-center gap-8 mb-4 border-b border-slate-200" role="tablist" {
            @for (mode, label) in [(FormMode::Login, "Account Login"), (FormMode::Registration, "Register")] {
                @let class = if mode == active {
                    "pb-2 border-b-2 border-blue-600 text-blue-600 font-medium"
                } else {
                    "pb-2 text-slate-500 hover:text-slate-800"
                };
                a href=(page.href("/login", Some(&format!("tab={}", mode.as_str()))))
                    class=(class) role="tab" aria-selected=(if mode == active { "true" } else { "false" }) {
                    (label)
                }
            }
        }
    }
}

fn error_banner(mode: FormMode) -> Markup {
    let message = match mode {
        FormMode::Login => "Incorrect username or password",
        FormMode::Registration => "Registration was rejected, please check your details",
    };
    html! {
        div class="bg-red-50 border border-red-300 text-red-800 px-4 py-3 rounded-lg" role="alert" {
            i class="fa-solid fa-circle-exclamation mr-2" {}
            (message)
        }
    }
}

fn login_fields(page: &LoginPage) -> Markup {
    html! {
        div class="space-y-4" {
            @for spec in LOGIN_FIELDS {
                @let icon = if spec.name == "password" { "fa-lock" } else { "fa-user" };
                div {
                    div class="relative" {
                        i class={ "fa-solid absolute left-3 top-3.5 text-slate-400 " (icon) } {}
                        (input(page, spec, true))
                    }
                    (required_hint(page, spec))
                }
            }
        }
    }
}

fn registration_fields(page: &LoginPage) -> Markup {
    let (grid, confirm) = REGISTRATION_FIELDS.split_at(REGISTRATION_FIELDS.len() - 1);
    html! {
        div class="grid grid-cols-2 gap-x-6 gap-y-4" {
            @for spec in grid {
                div {
                    label for=(spec.name) class="block mb-2 text-sm font-medium" { (spec.label) }
                    @if spec.name == "userType" {
                        (user_type_select(page, spec))
                    } @else {
                        (input(page, spec, false))
                    }
                    (required_hint(page, spec))
                }
            }
        }
        @for spec in confirm {
            div {
                label for=(spec.name) class="block mb-2 text-sm font-medium" { (spec.label) }
                (input(page, spec, false))
                (required_hint(page, spec))
            }
        }
    }
}

fn input(page: &LoginPage, spec: &FieldSpec, with_icon: bool) -> Markup {
    let secret = spec.name == "password" || spec.name == "confirmPassword";
    let kind = match spec.name {
        _ if secret => "password",
        "email" => "email",
        "phone" => "tel",
        _ => "text",
    };
    let class = if with_icon {
        format!("{} pl-10", INPUT_CLASS)
    } else {
        INPUT_CLASS.to_string()
    };
    html! {
        input type=(kind) id=(spec.name) name=(spec.name) required
            class=(class)
            placeholder=(spec.label)
            value=[(!secret).then(|| page.value(spec.name)).filter(|v| !v.is_empty())];
    }
}

fn user_type_select(page: &LoginPage, spec: &FieldSpec) -> Markup {
    let selected = page.value(spec.name);
    html! {
        select id=(spec.name) name=(spec.name) required class=(INPUT_CLASS) {
            option value="" selected[selected.is_empty()] { "Select..." }
            @for user_type in UserType::ALL {
                option value=(user_type.as_str()) selected[selected == user_type.as_str()] {
                    (user_type.label())
                }
            }
        }
    }
}

fn required_hint(page: &LoginPage, spec: &FieldSpec) -> Markup {
    html! {
        @if page.is_missing(spec.name) {
            p class="field-error mt-1 text-sm text-red-600" data-field=(spec.name) {
                (spec.required_message)
            }
        }
    }
}
