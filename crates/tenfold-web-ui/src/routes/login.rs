use axum::Form;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use maud::{Markup, html};
use serde::Deserialize;

use super::Maud;
use crate::error::RequestResult;
use crate::layout::render_notice;
use crate::serde_util::empty_string_as_none;
use crate::{SharedState, UiState};

#[derive(Deserialize)]
pub struct RedirectQuery {
    redirect: Option<String>,
}

pub async fn get(
    state: State<SharedState>,
    Query(query): Query<RedirectQuery>,
) -> RequestResult<Response> {
    // Someone already signed in has no business on this page.
    if state.session().is_authenticated() {
        return Ok(Redirect::to("/").into_response());
    }

    Ok(Maud(state.login_page(None, None, query.redirect)).into_response())
}

#[derive(Deserialize)]
pub struct Input {
    email: String,
    password: String,
    #[serde(default)]
    #[serde(deserialize_with = "empty_string_as_none")]
    redirect: Option<String>,
}

pub async fn post_login(
    state: State<SharedState>,
    Form(form): Form<Input>,
) -> RequestResult<Response> {
    match state.client().login(&form.email, &form.password).await {
        Ok(_session) => {
            // The in-memory session is authoritative the moment `login`
            // returns; redirect straight away, nothing to re-read.
            let target = form
                .redirect
                .filter(|p| p.starts_with('/'))
                .unwrap_or_else(|| "/".to_string());
            Ok(Redirect::to(&target).into_response())
        }
        Err(err) => Ok(Maud(state.login_page(
            Some(&form.email),
            Some(render_notice(&err.user_message())),
            form.redirect,
        ))
        .into_response()),
    }
}

/// Sign out and land on the sign-in page, whatever else happens.
pub async fn post_logout(state: State<SharedState>) -> RequestResult<Response> {
    state.client().logout().await?;

    Ok(Redirect::to("/login").into_response())
}

impl UiState {
    fn login_page(
        &self,
        current_email: Option<&str>,
        notification: Option<Markup>,
        redirect: Option<String>,
    ) -> Markup {
        let content = html! {
            div ."o-loginScreen" {
                form ."o-loginScreen__form"
                    action="/login"
                    method="post"
                    autocomplete="on"
                {
                    @if let Some(ref redirect_path) = redirect {
                        input type="hidden" name="redirect" value=(redirect_path) {}
                    }
                    @if let Some(n) = notification {
                        (n)
                    }
                    div ."o-loginScreen__header" {
                        h4 { "Sign in to tenfold" }
                        p { "Use your CRM account credentials." }
                    }
                    div ."o-loginScreen__field" {
                        input ."o-loginScreen__email"
                            type="email"
                            name="email"
                            placeholder="Email"
                            autocomplete="username"
                            required
                            value=(current_email.unwrap_or_default())
                            {}
                    }
                    div ."o-loginScreen__field" {
                        input ."o-loginScreen__password"
                            type="password"
                            name="password"
                            placeholder="Password"
                            autocomplete="current-password"
                            required
                            {}
                    }
                    button ."o-loginScreen__submit u-button" type="submit" { "Sign in" }
                }
            }
        };
        self.render_html_page("Sign in", content)
    }
}
