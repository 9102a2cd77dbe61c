use axum::Form;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect};
use maud::{Markup, html};
use serde::Deserialize;
use tenfold_core::{Lead, LeadCreate, LeadPatch};

use super::Maud;
use super::session::AuthSession;
use crate::SharedState;
use crate::error::RequestResult;
use crate::serde_util::empty_string_as_none;

const STATUSES: &[(&str, &str)] = &[
    ("new", "New"),
    ("contacted", "Contacted"),
    ("qualified", "Qualified"),
    ("lost", "Lost"),
];

const SOURCES: &[(&str, &str)] = &[
    ("website", "Website"),
    ("referral", "Referral"),
    ("social_media", "Social Media"),
    ("advertising", "Advertising"),
    ("other", "Other"),
];

pub async fn get_list(
    state: State<SharedState>,
    AuthSession(session): AuthSession,
) -> RequestResult<impl IntoResponse> {
    let leads = state.client().leads().await?;

    let body = html! {
        div ."o-listActions" {
            a ."u-button" href="/leads/new" { "New lead" }
        }
        (render_table(&leads))
    };

    Ok(Maud(state.render_console_page(&session, "leads", "Leads", body)))
}

pub async fn get_new(
    state: State<SharedState>,
    AuthSession(session): AuthSession,
) -> RequestResult<impl IntoResponse> {
    let body = render_form("/leads", None);
    Ok(Maud(state.render_console_page(&session, "leads", "New lead", body)))
}

#[derive(Deserialize)]
pub struct Input {
    title: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    description: Option<String>,
    status: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    source: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    contact_id: Option<u64>,
}

pub async fn post_create(
    state: State<SharedState>,
    AuthSession(_session): AuthSession,
    Form(form): Form<Input>,
) -> RequestResult<impl IntoResponse> {
    let lead = LeadCreate {
        title: form.title,
        description: form.description,
        status: form.status,
        source: form.source,
        contact_id: form.contact_id,
    };
    state.client().create_lead(&lead).await?;

    Ok(Redirect::to("/leads"))
}

pub async fn get_edit(
    state: State<SharedState>,
    AuthSession(session): AuthSession,
    Path(id): Path<u64>,
) -> RequestResult<impl IntoResponse> {
    let lead = state.client().lead(id).await?;

    let body = render_form(&format!("/leads/{id}/edit"), Some(&lead));
    Ok(Maud(state.render_console_page(&session, "leads", "Edit lead", body)))
}

pub async fn post_edit(
    state: State<SharedState>,
    AuthSession(_session): AuthSession,
    Path(id): Path<u64>,
    Form(form): Form<Input>,
) -> RequestResult<impl IntoResponse> {
    let patch = LeadPatch {
        title: Some(form.title),
        description: form.description,
        status: Some(form.status),
        source: form.source,
        contact_id: form.contact_id,
    };
    state.client().update_lead(id, &patch).await?;

    Ok(Redirect::to("/leads"))
}

pub async fn post_delete(
    state: State<SharedState>,
    AuthSession(_session): AuthSession,
    Path(id): Path<u64>,
) -> RequestResult<impl IntoResponse> {
    state.client().delete_lead(id).await?;

    Ok(Redirect::to("/leads"))
}

fn render_table(leads: &[Lead]) -> Markup {
    html! {
        table ."o-table" {
            thead {
                tr {
                    th { "Title" }
                    th { "Status" }
                    th { "Source" }
                    th { "Created" }
                    th ."o-table__actions" {}
                }
            }
            tbody {
                @if leads.is_empty() {
                    tr { td ."o-table__empty" colspan="5" { "No leads yet." } }
                }
                @for lead in leads {
                    tr {
                        td { (lead.title) }
                        td { span ."o-badge" { (lead.status) } }
                        td { (lead.source.as_deref().unwrap_or("—")) }
                        td { (lead.created_at) }
                        td ."o-table__actions" {
                            a ."u-button -small" href={ "/leads/" (lead.id) "/edit" } { "Edit" }
                            form action={ "/leads/" (lead.id) "/delete" } method="post" {
                                button ."u-button -small -danger" type="submit" { "Delete" }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn render_form(action: &str, existing: Option<&Lead>) -> Markup {
    let status = existing.map(|l| l.status.as_str()).unwrap_or("new");
    let source = existing.and_then(|l| l.source.as_deref()).unwrap_or("");

    html! {
        form ."o-resourceForm" action=(action) method="post" {
            div ."o-resourceForm__field" {
                label { "Title" }
                input type="text" name="title" required
                    value=(existing.map(|l| l.title.clone()).unwrap_or_default()) {}
            }
            div ."o-resourceForm__field" {
                label { "Description" }
                textarea name="description" rows="3" {
                    (existing.and_then(|l| l.description.as_deref()).unwrap_or_default())
                }
            }
            div ."o-resourceForm__field" {
                label { "Status" }
                select name="status" {
                    @for (value, label) in STATUSES {
                        option value=(value) selected[*value == status] { (label) }
                    }
                }
            }
            div ."o-resourceForm__field" {
                label { "Source" }
                select name="source" {
                    option value="" { "Select source" }
                    @for (value, label) in SOURCES {
                        option value=(value) selected[*value == source] { (label) }
                    }
                }
            }
            div ."o-resourceForm__field" {
                label { "Contact id" }
                input type="number" name="contact_id" min="1"
                    value=(existing.and_then(|l| l.contact_id).map(|id| id.to_string()).unwrap_or_default()) {}
            }
            div ."o-resourceForm__actions" {
                button ."u-button" type="submit" { "Save" }
                a ."u-button -secondary" href="/leads" { "Cancel" }
            }
        }
    }
}
