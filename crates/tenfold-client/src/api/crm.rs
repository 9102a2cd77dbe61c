//! Tenant-scoped CRM resources. The scoping send path attaches the tenant
//! header for non-admin sessions; these wrappers only name paths and
//! payloads.

use reqwest::Method;
use tenfold_core::{
    Contact, ContactCreate, ContactPatch, Lead, LeadCreate, LeadPatch, Opportunity,
    OpportunityCreate, OpportunityPatch,
};

use crate::Client;
use crate::error::RequestResult;

impl Client {
    pub async fn contacts(&self) -> RequestResult<Vec<Contact>> {
        self.fetch_json(Method::GET, "/crm/contacts/").await
    }

    pub async fn contact(&self, id: u64) -> RequestResult<Contact> {
        self.fetch_json(Method::GET, &format!("/crm/contacts/{id}")).await
    }

    pub async fn create_contact(&self, contact: &ContactCreate) -> RequestResult<Contact> {
        self.send_json(Method::POST, "/crm/contacts/", contact).await
    }

    pub async fn update_contact(&self, id: u64, patch: &ContactPatch) -> RequestResult<Contact> {
        self.send_json(Method::PUT, &format!("/crm/contacts/{id}"), patch)
            .await
    }

    pub async fn delete_contact(&self, id: u64) -> RequestResult<()> {
        self.send_no_content(Method::DELETE, &format!("/crm/contacts/{id}"))
            .await
    }

    pub async fn leads(&self) -> RequestResult<Vec<Lead>> {
        self.fetch_json(Method::GET, "/crm/leads/").await
    }

    pub async fn lead(&self, id: u64) -> RequestResult<Lead> {
        self.fetch_json(Method::GET, &format!("/crm/leads/{id}")).await
    }

    pub async fn create_lead(&self, lead: &LeadCreate) -> RequestResult<Lead> {
        self.send_json(Method::POST, "/crm/leads/", lead).await
    }

    pub async fn update_lead(&self, id: u64, patch: &LeadPatch) -> RequestResult<Lead> {
        self.send_json(Method::PUT, &format!("/crm/leads/{id}"), patch)
            .await
    }

    pub async fn delete_lead(&self, id: u64) -> RequestResult<()> {
        self.send_no_content(Method::DELETE, &format!("/crm/leads/{id}"))
            .await
    }

    pub async fn opportunities(&self) -> RequestResult<Vec<Opportunity>> {
        self.fetch_json(Method::GET, "/crm/opportunities/").await
    }

    pub async fn opportunity(&self, id: u64) -> RequestResult<Opportunity> {
        self.fetch_json(Method::GET, &format!("/crm/opportunities/{id}"))
            .await
    }

    pub async fn create_opportunity(
        &self,
        opportunity: &OpportunityCreate,
    ) -> RequestResult<Opportunity> {
        self.send_json(Method::POST, "/crm/opportunities/", opportunity)
            .await
    }

    pub async fn update_opportunity(
        &self,
        id: u64,
        patch: &OpportunityPatch,
    ) -> RequestResult<Opportunity> {
        self.send_json(Method::PUT, &format!("/crm/opportunities/{id}"), patch)
            .await
    }

    pub async fn delete_opportunity(&self, id: u64) -> RequestResult<()> {
        self.send_no_content(Method::DELETE, &format!("/crm/opportunities/{id}"))
            .await
    }
}
