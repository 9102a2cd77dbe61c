use axum::Form;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect};
use maud::{Markup, html};
use serde::Deserialize;
use tenfold_core::{Opportunity, OpportunityCreate, OpportunityPatch};

use super::Maud;
use super::session::AuthSession;
use crate::SharedState;
use crate::error::RequestResult;
use crate::serde_util::empty_string_as_none;

const STAGES: &[(&str, &str)] = &[
    ("prospecting", "Prospecting"),
    ("qualification", "Qualification"),
    ("proposal", "Proposal"),
    ("negotiation", "Negotiation"),
    ("closed_won", "Closed Won"),
    ("closed_lost", "Closed Lost"),
];

pub async fn get_list(
    state: State<SharedState>,
    AuthSession(session): AuthSession,
) -> RequestResult<impl IntoResponse> {
    let opportunities = state.client().opportunities().await?;

    let body = html! {
        div ."o-listActions" {
            a ."u-button" href="/opportunities/new" { "New opportunity" }
        }
        (render_table(&opportunities))
    };

    Ok(Maud(state.render_console_page(&session, "opportunities", "Opportunities", body)))
}

pub async fn get_new(
    state: State<SharedState>,
    AuthSession(session): AuthSession,
) -> RequestResult<impl IntoResponse> {
    let body = render_form("/opportunities", None);
    Ok(Maud(state.render_console_page(&session, "opportunities", "New opportunity", body)))
}

#[derive(Deserialize)]
pub struct Input {
    name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    description: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    amount: Option<f64>,
    stage: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    probability: Option<i32>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    close_date: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    contact_id: Option<u64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    lead_id: Option<u64>,
}

pub async fn post_create(
    state: State<SharedState>,
    AuthSession(_session): AuthSession,
    Form(form): Form<Input>,
) -> RequestResult<impl IntoResponse> {
    let opportunity = OpportunityCreate {
        name: form.name,
        description: form.description,
        amount: form.amount,
        stage: form.stage,
        probability: form.probability.unwrap_or_default(),
        close_date: form.close_date,
        contact_id: form.contact_id,
        lead_id: form.lead_id,
    };
    state.client().create_opportunity(&opportunity).await?;

    Ok(Redirect::to("/opportunities"))
}

pub async fn get_edit(
    state: State<SharedState>,
    AuthSession(session): AuthSession,
    Path(id): Path<u64>,
) -> RequestResult<impl IntoResponse> {
    let opportunity = state.client().opportunity(id).await?;

    let body = render_form(&format!("/opportunities/{id}/edit"), Some(&opportunity));
    Ok(Maud(state.render_console_page(&session, "opportunities", "Edit opportunity", body)))
}

pub async fn post_edit(
    state: State<SharedState>,
    AuthSession(_session): AuthSession,
    Path(id): Path<u64>,
    Form(form): Form<Input>,
) -> RequestResult<impl IntoResponse> {
    let patch = OpportunityPatch {
        name: Some(form.name),
        description: form.description,
        amount: form.amount,
        stage: Some(form.stage),
        probability: Some(form.probability.unwrap_or_default()),
        close_date: form.close_date,
        contact_id: form.contact_id,
        lead_id: form.lead_id,
    };
    state.client().update_opportunity(id, &patch).await?;

    Ok(Redirect::to("/opportunities"))
}

pub async fn post_delete(
    state: State<SharedState>,
    AuthSession(_session): AuthSession,
    Path(id): Path<u64>,
) -> RequestResult<impl IntoResponse> {
    state.client().delete_opportunity(id).await?;

    Ok(Redirect::to("/opportunities"))
}

fn render_table(opportunities: &[Opportunity]) -> Markup {
    html! {
        table ."o-table" {
            thead {
                tr {
                    th { "Name" }
                    th { "Stage" }
                    th { "Amount" }
                    th { "Probability" }
                    th { "Close date" }
                    th ."o-table__actions" {}
                }
            }
            tbody {
                @if opportunities.is_empty() {
                    tr { td ."o-table__empty" colspan="6" { "No opportunities yet." } }
                }
                @for opportunity in opportunities {
                    tr {
                        td { (opportunity.name) }
                        td { span ."o-badge" { (opportunity.stage) } }
                        td {
                            @if let Some(amount) = opportunity.amount {
                                (format!("{amount:.2}"))
                            } @else {
                                "—"
                            }
                        }
                        td { (opportunity.probability) "%" }
                        td { (opportunity.close_date.as_deref().unwrap_or("—")) }
                        td ."o-table__actions" {
                            a ."u-button -small" href={ "/opportunities/" (opportunity.id) "/edit" } { "Edit" }
                            form action={ "/opportunities/" (opportunity.id) "/delete" } method="post" {
                                button ."u-button -small -danger" type="submit" { "Delete" }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn render_form(action: &str, existing: Option<&Opportunity>) -> Markup {
    let stage = existing.map(|o| o.stage.as_str()).unwrap_or("prospecting");

    html! {
        form ."o-resourceForm" action=(action) method="post" {
            div ."o-resourceForm__field" {
                label { "Name" }
                input type="text" name="name" required
                    value=(existing.map(|o| o.name.clone()).unwrap_or_default()) {}
            }
            div ."o-resourceForm__field" {
                label { "Description" }
                textarea name="description" rows="3" {
                    (existing.and_then(|o| o.description.as_deref()).unwrap_or_default())
                }
            }
            div ."o-resourceForm__field" {
                label { "Amount" }
                input type="number" name="amount" step="0.01" min="0"
                    value=(existing.and_then(|o| o.amount).map(|a| a.to_string()).unwrap_or_default()) {}
            }
            div ."o-resourceForm__field" {
                label { "Stage" }
                select name="stage" {
                    @for (value, label) in STAGES {
                        option value=(value) selected[*value == stage] { (label) }
                    }
                }
            }
            div ."o-resourceForm__field" {
                label { "Probability (%)" }
                input type="number" name="probability" min="0" max="100"
                    value=(existing.map(|o| o.probability.to_string()).unwrap_or_else(|| "0".to_owned())) {}
            }
            div ."o-resourceForm__field" {
                label { "Close date" }
                input type="date" name="close_date"
                    value=(existing.and_then(|o| o.close_date.as_deref()).unwrap_or_default()) {}
            }
            div ."o-resourceForm__field" {
                label { "Contact id" }
                input type="number" name="contact_id" min="1"
                    value=(existing.and_then(|o| o.contact_id).map(|id| id.to_string()).unwrap_or_default()) {}
            }
            div ."o-resourceForm__field" {
                label { "Lead id" }
                input type="number" name="lead_id" min="1"
                    value=(existing.and_then(|o| o.lead_id).map(|id| id.to_string()).unwrap_or_default()) {}
            }
            div ."o-resourceForm__actions" {
                button ."u-button" type="submit" { "Save" }
                a ."u-button -secondary" href="/opportunities" { "Cancel" }
            }
        }
    }
}
