use axum::Form;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect};
use maud::{Markup, html};
use serde::Deserialize;
use tenfold_core::{Contact, ContactCreate, ContactPatch};

use super::Maud;
use super::session::AuthSession;
use crate::SharedState;
use crate::error::RequestResult;
use crate::serde_util::empty_string_as_none;

pub async fn get_list(
    state: State<SharedState>,
    AuthSession(session): AuthSession,
) -> RequestResult<impl IntoResponse> {
    let contacts = state.client().contacts().await?;

    let body = html! {
        div ."o-listActions" {
            a ."u-button" href="/contacts/new" { "New contact" }
        }
        (render_table(&contacts))
    };

    Ok(Maud(state.render_console_page(&session, "contacts", "Contacts", body)))
}

pub async fn get_new(
    state: State<SharedState>,
    AuthSession(session): AuthSession,
) -> RequestResult<impl IntoResponse> {
    let body = render_form("/contacts", None);
    Ok(Maud(state.render_console_page(&session, "contacts", "New contact", body)))
}

#[derive(Deserialize)]
pub struct Input {
    first_name: String,
    last_name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    email: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    phone: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    company: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    title: Option<String>,
}

pub async fn post_create(
    state: State<SharedState>,
    AuthSession(_session): AuthSession,
    Form(form): Form<Input>,
) -> RequestResult<impl IntoResponse> {
    let contact = ContactCreate {
        first_name: form.first_name,
        last_name: form.last_name,
        email: form.email,
        phone: form.phone,
        company: form.company,
        title: form.title,
    };
    state.client().create_contact(&contact).await?;

    Ok(Redirect::to("/contacts"))
}

pub async fn get_edit(
    state: State<SharedState>,
    AuthSession(session): AuthSession,
    Path(id): Path<u64>,
) -> RequestResult<impl IntoResponse> {
    let contact = state.client().contact(id).await?;

    let body = render_form(&format!("/contacts/{id}/edit"), Some(&contact));
    Ok(Maud(state.render_console_page(&session, "contacts", "Edit contact", body)))
}

pub async fn post_edit(
    state: State<SharedState>,
    AuthSession(_session): AuthSession,
    Path(id): Path<u64>,
    Form(form): Form<Input>,
) -> RequestResult<impl IntoResponse> {
    let patch = ContactPatch {
        first_name: Some(form.first_name),
        last_name: Some(form.last_name),
        email: form.email,
        phone: form.phone,
        company: form.company,
        title: form.title,
    };
    state.client().update_contact(id, &patch).await?;

    Ok(Redirect::to("/contacts"))
}

pub async fn post_delete(
    state: State<SharedState>,
    AuthSession(_session): AuthSession,
    Path(id): Path<u64>,
) -> RequestResult<impl IntoResponse> {
    state.client().delete_contact(id).await?;

    Ok(Redirect::to("/contacts"))
}

fn render_table(contacts: &[Contact]) -> Markup {
    html! {
        table ."o-table" {
            thead {
                tr {
                    th { "Name" }
                    th { "Email" }
                    th { "Phone" }
                    th { "Company" }
                    th { "Title" }
                    th ."o-table__actions" {}
                }
            }
            tbody {
                @if contacts.is_empty() {
                    tr { td ."o-table__empty" colspan="6" { "No contacts yet." } }
                }
                @for contact in contacts {
                    tr {
                        td { (contact.first_name) " " (contact.last_name) }
                        td { (contact.email.as_deref().unwrap_or("—")) }
                        td { (contact.phone.as_deref().unwrap_or("—")) }
                        td { (contact.company.as_deref().unwrap_or("—")) }
                        td { (contact.title.as_deref().unwrap_or("—")) }
                        td ."o-table__actions" {
                            a ."u-button -small" href={ "/contacts/" (contact.id) "/edit" } { "Edit" }
                            form action={ "/contacts/" (contact.id) "/delete" } method="post" {
                                button ."u-button -small -danger" type="submit" { "Delete" }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn render_form(action: &str, existing: Option<&Contact>) -> Markup {
    let text_value = |value: Option<&str>| value.unwrap_or_default().to_owned();

    html! {
        form ."o-resourceForm" action=(action) method="post" {
            div ."o-resourceForm__field" {
                label { "First name" }
                input type="text" name="first_name" required
                    value=(existing.map(|c| c.first_name.clone()).unwrap_or_default()) {}
            }
            div ."o-resourceForm__field" {
                label { "Last name" }
                input type="text" name="last_name" required
                    value=(existing.map(|c| c.last_name.clone()).unwrap_or_default()) {}
            }
            div ."o-resourceForm__field" {
                label { "Email" }
                input type="email" name="email"
                    value=(text_value(existing.and_then(|c| c.email.as_deref()))) {}
            }
            div ."o-resourceForm__field" {
                label { "Phone" }
                input type="text" name="phone"
                    value=(text_value(existing.and_then(|c| c.phone.as_deref()))) {}
            }
            div ."o-resourceForm__field" {
                label { "Company" }
                input type="text" name="company"
                    value=(text_value(existing.and_then(|c| c.company.as_deref()))) {}
            }
            div ."o-resourceForm__field" {
                label { "Title" }
                input type="text" name="title"
                    value=(text_value(existing.and_then(|c| c.title.as_deref()))) {}
            }
            div ."o-resourceForm__actions" {
                button ."u-button" type="submit" { "Save" }
                a ."u-button -secondary" href="/contacts" { "Cancel" }
            }
        }
    }
}
