use axum::extract::State;
use axum::response::IntoResponse;
use maud::html;

use super::Maud;
use super::session::AuthSession;
use crate::SharedState;
use crate::error::RequestResult;

pub async fn get(
    state: State<SharedState>,
    AuthSession(session): AuthSession,
) -> RequestResult<impl IntoResponse> {
    let greeting = session
        .user()
        .map(|user| user.full_name.clone())
        .unwrap_or_else(|| "there".to_owned());

    let body = html! {
        p ."o-dashboard__greeting" { "Welcome back, " (greeting) "." }

        div ."o-dashboard__cards" {
            a ."o-dashboard__card" href="/contacts" {
                h3 { "Contacts" }
                p { "People your organization talks to." }
            }
            a ."o-dashboard__card" href="/leads" {
                h3 { "Leads" }
                p { "Unqualified interest, waiting for a follow-up." }
            }
            a ."o-dashboard__card" href="/opportunities" {
                h3 { "Opportunities" }
                p { "Deals in flight, by stage." }
            }
            @if session.is_admin() {
                a ."o-dashboard__card -admin" href="/admin" {
                    h3 { "Administration" }
                    p { "Tenants and user accounts." }
                }
            }
        }
    };

    Ok(Maud(state.render_console_page(&session, "dashboard", "Dashboard", body)))
}
