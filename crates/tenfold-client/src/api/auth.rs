use reqwest::Method;
use snafu::{ResultExt as _, ensure};
use tenfold_core::{AuthResponse, Tenant, TenantCreate, TenantId, User, UserCreate};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, info};

use super::GENERIC_LOGIN_FAILURE;
use crate::error::{
    EmptyCredentialsSnafu, EmptyTokenSnafu, LoginResult, MalformedResponseSnafu, RejectedSnafu,
    RequestResult, TransportSnafu,
};
use crate::{Client, LOG_TARGET, Session, extract_detail, scope};

impl Client {
    /// Authenticate against the backend and publish the session.
    ///
    /// Credentials travel as query parameters on `POST /auth/login/`; that
    /// is the backend's contract, not a choice made here. On any failure
    /// the session, in memory and durable, is exactly what it was before
    /// the call.
    pub async fn login(&self, email: &str, password: &str) -> LoginResult<Session> {
        ensure!(
            !email.is_empty() && !password.is_empty(),
            EmptyCredentialsSnafu
        );

        // Deliberately not `send()`: a login failure must leave the
        // current session alone, including the 401 teardown path.
        let path = "/auth/login/";
        let builder = scope::apply(
            self.http.post(self.url(path)),
            path,
            &self.session.scope(),
        );
        let resp = builder
            .query(&[("email", email), ("password", password)])
            .send()
            .await
            .context(TransportSnafu)?;

        let status = resp.status();
        let body = resp.text().await.context(TransportSnafu)?;
        if !status.is_success() {
            let detail =
                extract_detail(&body).unwrap_or_else(|| GENERIC_LOGIN_FAILURE.to_owned());
            debug!(target: LOG_TARGET, %status, "Login rejected");
            return RejectedSnafu { detail }.fail();
        }

        let auth: AuthResponse =
            serde_json::from_str(&body).context(MalformedResponseSnafu)?;
        ensure!(!auth.access_token.is_empty(), EmptyTokenSnafu);

        let user = build_user(&auth, email);
        let tenant_id = if user.is_superuser {
            None
        } else {
            Some(
                auth.tenant_id
                    .map(TenantId::from)
                    .unwrap_or_else(TenantId::fallback),
            )
        };

        self.session
            .set_logged_in(auth.access_token, user, tenant_id)
            .await?;

        let session = self.session.snapshot();
        info!(
            target: LOG_TARGET,
            user = session.user().map(|u| u.email.as_str()).unwrap_or_default(),
            admin = session.is_admin(),
            "Logged in"
        );
        Ok(session)
    }

    /// Drop the session, in memory and durably.
    ///
    /// Callers owning a UI are expected to land the user on the sign-in
    /// screen right after.
    pub async fn logout(&self) -> crate::error::DbResult<()> {
        info!(target: LOG_TARGET, "Logging out");
        self.session.clear().await
    }

    /// Self-serve tenant registration.
    pub async fn register_tenant(&self, tenant: &TenantCreate) -> RequestResult<Tenant> {
        self.send_json(Method::POST, "/auth/tenants/", tenant).await
    }

    /// Self-serve user registration.
    pub async fn register_user(&self, user: &UserCreate) -> RequestResult<User> {
        self.send_json(Method::POST, "/auth/users/", user).await
    }
}

/// Assemble the user record the session will carry, defaulting the fields
/// the login response may omit. The superuser flag arrives already
/// strictly parsed; nothing is re-derived from it here.
fn build_user(auth: &AuthResponse, login_email: &str) -> User {
    User {
        id: auth.user_id.unwrap_or(1),
        email: auth
            .email
            .clone()
            .unwrap_or_else(|| login_email.to_owned()),
        full_name: auth
            .full_name
            .clone()
            .unwrap_or_else(|| "User".to_owned()),
        is_active: true,
        is_superuser: auth.is_superuser,
        tenant_id: auth.tenant_id,
        created_at: OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .expect("Can't fail"),
    }
}
