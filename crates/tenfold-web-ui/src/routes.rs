mod admin;
mod contacts;
mod dashboard;
mod leads;
mod login;
mod opportunities;
pub mod session;

use axum::Router;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use maud::Markup;

use crate::SharedState;

#[derive(Clone, Debug)]
#[must_use]
pub struct Maud(pub Markup);

impl IntoResponse for Maud {
    fn into_response(self) -> Response {
        (
            [(
                header::CONTENT_TYPE,
                axum::http::HeaderValue::from_static("text/html; charset=utf-8"),
            )],
            self.0.0,
        )
            .into_response()
    }
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not Found")
}

pub fn route_handler(state: SharedState) -> Router {
    Router::new()
        .route("/", get(dashboard::get))
        .route("/login", get(login::get).post(login::post_login))
        .route("/logout", post(login::post_logout))
        .route(
            "/contacts",
            get(contacts::get_list).post(contacts::post_create),
        )
        .route("/contacts/new", get(contacts::get_new))
        .route(
            "/contacts/{id}/edit",
            get(contacts::get_edit).post(contacts::post_edit),
        )
        .route("/contacts/{id}/delete", post(contacts::post_delete))
        .route("/leads", get(leads::get_list).post(leads::post_create))
        .route("/leads/new", get(leads::get_new))
        .route(
            "/leads/{id}/edit",
            get(leads::get_edit).post(leads::post_edit),
        )
        .route("/leads/{id}/delete", post(leads::post_delete))
        .route(
            "/opportunities",
            get(opportunities::get_list).post(opportunities::post_create),
        )
        .route("/opportunities/new", get(opportunities::get_new))
        .route(
            "/opportunities/{id}/edit",
            get(opportunities::get_edit).post(opportunities::post_edit),
        )
        .route(
            "/opportunities/{id}/delete",
            post(opportunities::post_delete),
        )
        .route("/admin", get(admin::get))
        .route("/admin/tenants", post(admin::post_create_tenant))
        .route("/admin/tenants/{id}/delete", post(admin::post_delete_tenant))
        .route("/admin/users", post(admin::post_create_user))
        .route("/admin/users/{id}/delete", post(admin::post_delete_user))
        .route("/admin/crm", get(admin::get_tenant_crm))
        .fallback(not_found)
        .with_state(state)
}
