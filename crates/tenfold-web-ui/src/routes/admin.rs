//! Superuser panel: tenants, user accounts, and per-tenant CRM inspection.
//!
//! Gating happens twice: [`AdminSession`] keeps non-superusers out of the
//! pages, and the backend still checks the token on every call.

use axum::Form;
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Redirect};
use maud::{Markup, html};
use serde::Deserialize;
use tenfold_core::{Tenant, TenantCreate, TenantId, User, UserCreate};

use super::Maud;
use super::session::AdminSession;
use crate::SharedState;
use crate::error::RequestResult;
use crate::serde_util::empty_string_as_none;

pub async fn get(
    state: State<SharedState>,
    AdminSession(session): AdminSession,
) -> RequestResult<impl IntoResponse> {
    let tenants = state.client().tenants().await?;
    let users = state.client().users().await?;

    let body = html! {
        div ."o-adminPanel" {
            section ."o-adminPanel__section" {
                h3 { "Tenants" }
                (render_tenant_table(&tenants))
                (render_tenant_form())
            }
            section ."o-adminPanel__section" {
                h3 { "Users" }
                (render_user_table(&users))
                (render_user_form(&tenants))
            }
        }
    };

    Ok(Maud(state.render_console_page(&session, "admin", "Administration", body)))
}

#[derive(Deserialize)]
pub struct TenantInput {
    name: String,
}

pub async fn post_create_tenant(
    state: State<SharedState>,
    AdminSession(_session): AdminSession,
    Form(form): Form<TenantInput>,
) -> RequestResult<impl IntoResponse> {
    state
        .client()
        .create_tenant(&TenantCreate { name: form.name })
        .await?;

    Ok(Redirect::to("/admin"))
}

pub async fn post_delete_tenant(
    state: State<SharedState>,
    AdminSession(_session): AdminSession,
    Path(id): Path<u64>,
) -> RequestResult<impl IntoResponse> {
    state.client().delete_tenant(id).await?;

    Ok(Redirect::to("/admin"))
}

#[derive(Deserialize)]
pub struct UserInput {
    email: String,
    password: String,
    full_name: String,
    tenant_id: u64,
    /// Checkboxes submit `"on"` or nothing at all.
    #[serde(default)]
    is_superuser: Option<String>,
}

pub async fn post_create_user(
    state: State<SharedState>,
    AdminSession(_session): AdminSession,
    Form(form): Form<UserInput>,
) -> RequestResult<impl IntoResponse> {
    let user = UserCreate {
        email: form.email,
        password: form.password,
        full_name: form.full_name,
        tenant_id: form.tenant_id,
        is_superuser: form.is_superuser.is_some().then_some(true),
    };
    state.client().create_user(&user).await?;

    Ok(Redirect::to("/admin"))
}

pub async fn post_delete_user(
    state: State<SharedState>,
    AdminSession(_session): AdminSession,
    Path(id): Path<u64>,
) -> RequestResult<impl IntoResponse> {
    state.client().delete_user(id).await?;

    Ok(Redirect::to("/admin"))
}

#[derive(Deserialize)]
pub struct CrmQuery {
    tenant_id: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    resource: Option<String>,
}

/// Inspect one tenant's CRM data; the tenant is named explicitly per
/// request, never taken from the (admin) session.
pub async fn get_tenant_crm(
    state: State<SharedState>,
    AdminSession(session): AdminSession,
    Query(query): Query<CrmQuery>,
) -> RequestResult<impl IntoResponse> {
    let tenant_id: TenantId = query.tenant_id.parse().expect("Can't fail");
    let resource = query.resource.as_deref().unwrap_or("contacts");

    let table = match resource {
        "leads" => {
            let leads = state.client().tenant_leads(&tenant_id).await?;
            html! {
                table ."o-table" {
                    thead { tr { th { "Title" } th { "Status" } th { "Created" } } }
                    tbody {
                        @if leads.is_empty() {
                            tr { td ."o-table__empty" colspan="3" { "Nothing here." } }
                        }
                        @for lead in &leads {
                            tr { td { (lead.title) } td { (lead.status) } td { (lead.created_at) } }
                        }
                    }
                }
            }
        }
        "opportunities" => {
            let opportunities = state.client().tenant_opportunities(&tenant_id).await?;
            html! {
                table ."o-table" {
                    thead { tr { th { "Name" } th { "Stage" } th { "Created" } } }
                    tbody {
                        @if opportunities.is_empty() {
                            tr { td ."o-table__empty" colspan="3" { "Nothing here." } }
                        }
                        @for opportunity in &opportunities {
                            tr {
                                td { (opportunity.name) }
                                td { (opportunity.stage) }
                                td { (opportunity.created_at) }
                            }
                        }
                    }
                }
            }
        }
        _ => {
            let contacts = state.client().tenant_contacts(&tenant_id).await?;
            html! {
                table ."o-table" {
                    thead { tr { th { "Name" } th { "Email" } th { "Created" } } }
                    tbody {
                        @if contacts.is_empty() {
                            tr { td ."o-table__empty" colspan="3" { "Nothing here." } }
                        }
                        @for contact in &contacts {
                            tr {
                                td { (contact.first_name) " " (contact.last_name) }
                                td { (contact.email.as_deref().unwrap_or("—")) }
                                td { (contact.created_at) }
                            }
                        }
                    }
                }
            }
        }
    };

    let body = html! {
        div ."o-adminCrm__tabs" {
            @for tab in ["contacts", "leads", "opportunities"] {
                a ."o-adminCrm__tab"
                    ."-active"[tab == resource]
                    href={ "/admin/crm?tenant_id=" (tenant_id) "&resource=" (tab) }
                {
                    (tab)
                }
            }
        }
        (table)
    };

    let title = format!("Tenant {tenant_id}: {resource}");
    Ok(Maud(state.render_console_page(&session, "admin", &title, body)))
}

fn render_tenant_table(tenants: &[Tenant]) -> Markup {
    html! {
        table ."o-table" {
            thead {
                tr {
                    th { "Id" }
                    th { "Name" }
                    th { "Schema" }
                    th { "Active" }
                    th ."o-table__actions" {}
                }
            }
            tbody {
                @if tenants.is_empty() {
                    tr { td ."o-table__empty" colspan="5" { "No tenants yet." } }
                }
                @for tenant in tenants {
                    tr {
                        td { (tenant.id) }
                        td { (tenant.name) }
                        td { (tenant.schema_name) }
                        td { (if tenant.is_active { "yes" } else { "no" }) }
                        td ."o-table__actions" {
                            a ."u-button -small"
                                href={ "/admin/crm?tenant_id=" (tenant.id) } { "Inspect" }
                            form action={ "/admin/tenants/" (tenant.id) "/delete" } method="post" {
                                button ."u-button -small -danger" type="submit" { "Delete" }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn render_tenant_form() -> Markup {
    html! {
        form ."o-inlineForm" action="/admin/tenants" method="post" {
            input type="text" name="name" placeholder="Tenant name" required {}
            button ."u-button" type="submit" { "Create tenant" }
        }
    }
}

fn render_user_table(users: &[User]) -> Markup {
    html! {
        table ."o-table" {
            thead {
                tr {
                    th { "Id" }
                    th { "Email" }
                    th { "Name" }
                    th { "Role" }
                    th { "Tenant" }
                    th ."o-table__actions" {}
                }
            }
            tbody {
                @if users.is_empty() {
                    tr { td ."o-table__empty" colspan="6" { "No users yet." } }
                }
                @for user in users {
                    tr {
                        td { (user.id) }
                        td { (user.email) }
                        td { (user.full_name) }
                        td {
                            @if user.is_superuser {
                                span ."o-badge -admin" { "superuser" }
                            } @else {
                                span ."o-badge" { "member" }
                            }
                        }
                        td {
                            @if let Some(tenant_id) = user.tenant_id {
                                (tenant_id)
                            } @else {
                                "—"
                            }
                        }
                        td ."o-table__actions" {
                            form action={ "/admin/users/" (user.id) "/delete" } method="post" {
                                button ."u-button -small -danger" type="submit" { "Delete" }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn render_user_form(tenants: &[Tenant]) -> Markup {
    html! {
        form ."o-inlineForm" action="/admin/users" method="post" {
            input type="email" name="email" placeholder="Email" required {}
            input type="password" name="password" placeholder="Password" required {}
            input type="text" name="full_name" placeholder="Full name" required {}
            select name="tenant_id" {
                @for tenant in tenants {
                    option value=(tenant.id) { (tenant.name) }
                }
            }
            label ."o-inlineForm__check" {
                input type="checkbox" name="is_superuser" {}
                "Superuser"
            }
            button ."u-button" type="submit" { "Create user" }
        }
    }
}
