//! Request scoping: the one place deciding which authorization headers an
//! outgoing request carries.
//!
//! Kept as a pure function over an explicit [`RequestScope`] snapshot so
//! the "read session state before dispatch" ordering is visible in the
//! signature: the snapshot is taken synchronously at request-construction
//! time, and nothing a concurrent logout does afterwards can reach into an
//! already shaped request.

use reqwest::RequestBuilder;
use tenfold_core::TenantId;
use tracing::debug;

const LOG_TARGET: &str = "tenfold::client::scope";

/// Header carrying the active tenant identifier.
pub const TENANT_HEADER: &str = "X-Tenant-ID";

/// Point-in-time authorization state of the session.
#[derive(Debug, Default, Clone)]
pub struct RequestScope {
    pub token: Option<String>,
    pub is_admin: bool,
    pub tenant_id: Option<TenantId>,
}

/// Does this path address a tenant-scoped CRM resource?
///
/// Matches a whole `crm` path segment: `/crm/contacts/` and
/// `/admin/crm/leads/` qualify, `/crmx/` does not.
pub fn is_tenant_scoped(path: &str) -> bool {
    path.split('/').any(|segment| segment == "crm")
}

/// Shape one outgoing request:
///
/// 1. a known token rides along as a bearer credential;
/// 2. tenant-scoped path and a non-admin session: attach the tenant header
///    when a tenant id is known, otherwise send the request bare and let
///    the server rule on it;
/// 3. admin sessions and non-tenant-scoped paths never get the tenant
///    header, whatever tenant state may linger in storage.
pub fn apply(builder: RequestBuilder, path: &str, scope: &RequestScope) -> RequestBuilder {
    let mut builder = builder;

    if let Some(token) = &scope.token {
        builder = builder.bearer_auth(token);
    }

    if is_tenant_scoped(path) && !scope.is_admin {
        match &scope.tenant_id {
            Some(tenant_id) => {
                builder = builder.header(TENANT_HEADER, tenant_id.as_str());
            }
            None => {
                debug!(target: LOG_TARGET, %path, "No tenant id for tenant-scoped request");
            }
        }
    }

    builder
}
