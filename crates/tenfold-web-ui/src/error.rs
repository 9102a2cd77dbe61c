use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use snafu::Snafu;
use tenfold_client::error::RequestError as ClientError;
use tenfold_util_error::FmtCompact as _;
use tracing::{debug, warn};

use crate::LOG_TARGET;

#[derive(Debug, Snafu)]
pub enum RequestError {
    /// No authenticated session; the browser belongs on the sign-in page.
    #[snafu(visibility(pub(crate)))]
    LoginRequired { redirect: Option<String> },
    /// Authenticated but not a superuser on a superuser-only page.
    #[snafu(visibility(pub(crate)))]
    NotAdmin,
    #[snafu(transparent)]
    Client { source: ClientError },
    #[snafu(transparent)]
    Session {
        source: tenfold_client::error::DbError,
    },
}

pub type RequestResult<T> = std::result::Result<T, RequestError>;

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        debug!(
            target: LOG_TARGET,
            err = %self.fmt_compact(),
            "Request Error"
        );

        match self {
            RequestError::LoginRequired { redirect } => {
                let url = match redirect {
                    Some(ref path) => {
                        format!("/login?redirect={}", urlencoding::encode(path))
                    }
                    None => "/login".to_string(),
                };
                Redirect::to(&url).into_response()
            }
            // The client has already torn the session down; all that is
            // left is landing the browser on the sign-in page.
            RequestError::Client {
                source: ClientError::AuthExpired,
            } => Redirect::to("/login").into_response(),
            RequestError::NotAdmin => Redirect::to("/").into_response(),
            RequestError::Client {
                source: ClientError::Api { status, detail },
            } => (
                StatusCode::BAD_GATEWAY,
                format!("Backend rejected the request ({status}): {detail}"),
            )
                .into_response(),
            err => {
                warn!(
                    target: LOG_TARGET,
                    err = %err.fmt_compact(),
                    "Unexpected Request Error"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Service Error".to_owned(),
                )
                    .into_response()
            }
        }
    }
}
