//! Superuser-only management endpoints.
//!
//! The backend enforces the privilege; these calls simply fail for
//! non-superuser tokens. Admin reads of a tenant's CRM data name the
//! tenant explicitly per call instead of relying on session scoping,
//! which never applies to admin sessions.

use reqwest::Method;
use tenfold_core::{
    Contact, Lead, Opportunity, Tenant, TenantCreate, TenantId, TenantPatch, User, UserCreate,
    UserPatch,
};

use crate::error::RequestResult;
use crate::{Client, TENANT_HEADER};

impl Client {
    pub async fn tenants(&self) -> RequestResult<Vec<Tenant>> {
        self.fetch_json(Method::GET, "/admin/tenants/").await
    }

    pub async fn create_tenant(&self, tenant: &TenantCreate) -> RequestResult<Tenant> {
        self.send_json(Method::POST, "/admin/tenants/", tenant).await
    }

    pub async fn update_tenant(&self, id: u64, patch: &TenantPatch) -> RequestResult<Tenant> {
        self.send_json(Method::PUT, &format!("/admin/tenants/{id}"), patch)
            .await
    }

    pub async fn delete_tenant(&self, id: u64) -> RequestResult<()> {
        self.send_no_content(Method::DELETE, &format!("/admin/tenants/{id}"))
            .await
    }

    pub async fn users(&self) -> RequestResult<Vec<User>> {
        self.fetch_json(Method::GET, "/admin_users/users/").await
    }

    pub async fn create_user(&self, user: &UserCreate) -> RequestResult<User> {
        self.send_json(Method::POST, "/admin_users/users/", user).await
    }

    pub async fn update_user(&self, id: u64, patch: &UserPatch) -> RequestResult<User> {
        self.send_json(Method::PUT, &format!("/admin_users/users/{id}"), patch)
            .await
    }

    pub async fn delete_user(&self, id: u64) -> RequestResult<()> {
        self.send_no_content(Method::DELETE, &format!("/admin_users/users/{id}"))
            .await
    }

    /// Inspect one tenant's contacts as an admin.
    pub async fn tenant_contacts(&self, tenant_id: &TenantId) -> RequestResult<Vec<Contact>> {
        self.admin_crm_fetch("/admin/crm/contacts/", tenant_id).await
    }

    /// Inspect one tenant's leads as an admin.
    pub async fn tenant_leads(&self, tenant_id: &TenantId) -> RequestResult<Vec<Lead>> {
        self.admin_crm_fetch("/admin/crm/leads/", tenant_id).await
    }

    /// Inspect one tenant's opportunities as an admin.
    pub async fn tenant_opportunities(
        &self,
        tenant_id: &TenantId,
    ) -> RequestResult<Vec<Opportunity>> {
        self.admin_crm_fetch("/admin/crm/opportunities/", tenant_id).await
    }

    async fn admin_crm_fetch<T>(&self, path: &str, tenant_id: &TenantId) -> RequestResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let builder = self
            .scoped(Method::GET, path)
            .header(TENANT_HEADER, tenant_id.as_str());
        self.request_json(builder).await
    }
}
