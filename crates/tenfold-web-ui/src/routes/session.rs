use axum::extract::{FromRequestParts, State};
use axum::http::request;
use tenfold_client::Session;

use crate::SharedState;
use crate::error::{LoginRequiredSnafu, NotAdminSnafu, RequestError};

/// Extractor yielding the current session snapshot, rejecting requests
/// that carry no authenticated session with a redirect to the sign-in
/// page (which remembers where the browser was headed).
///
/// The snapshot is taken once per request; handlers read role and tenant
/// from it instead of re-deriving state mid-render.
pub struct AuthSession(pub Session);

impl FromRequestParts<SharedState> for AuthSession {
    type Rejection = RequestError;

    async fn from_request_parts(
        parts: &mut request::Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let State(state) = State::<SharedState>::from_request_parts(parts, state)
            .await
            .expect("Can't fail");

        let session = state.session();
        if !session.is_authenticated() {
            return LoginRequiredSnafu {
                redirect: Some(parts.uri.path().to_owned()),
            }
            .fail();
        }

        Ok(Self(session))
    }
}

/// [`AuthSession`] that additionally requires a superuser; everyone else
/// is sent back to the dashboard.
pub struct AdminSession(pub Session);

impl FromRequestParts<SharedState> for AdminSession {
    type Rejection = RequestError;

    async fn from_request_parts(
        parts: &mut request::Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let AuthSession(session) = AuthSession::from_request_parts(parts, state).await?;

        if !session.is_admin() {
            return NotAdminSnafu.fail();
        }

        Ok(Self(session))
    }
}
