//! Client side of the tenfold console: the session and every request that
//! leaves the process.
//!
//! [`Client`] owns a [`SessionStore`] (restored from its redb snapshot at
//! construction) and a reqwest client, and routes all resource calls
//! through one scoped send path: bearer/tenant headers are attached from a
//! synchronous session snapshot before dispatch, and a 401 from the
//! backend tears the whole session down before the failure reaches the
//! caller. Failed requests are never retried here.

pub mod db;
pub mod error;

mod api;
mod scope;
mod session;

use std::path::PathBuf;

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use snafu::{ResultExt as _, ensure};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{
    ApiSnafu, AuthExpiredSnafu, BackendUrlSnafu, DecodeSnafu, HttpClientSnafu, HttpSnafu,
    InitResult, RequestResult,
};

pub use crate::api::GENERIC_LOGIN_FAILURE;
pub use crate::scope::{RequestScope, TENANT_HEADER, is_tenant_scoped};
pub use crate::session::{Session, SessionStore};

const LOG_TARGET: &str = "tenfold::client";

/// Default backend the console talks to when not configured otherwise.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000/api/v1";

pub struct Client {
    pub(crate) http: reqwest::Client,
    /// Normalized: scheme + authority + path prefix, no trailing slash.
    pub(crate) base_url: String,
    pub(crate) session: SessionStore,
}

#[bon::bon]
impl Client {
    #[builder(finish_fn(name = "build"))]
    pub async fn new(
        #[builder(into)] base_url: Option<String>,
        #[builder(into)] db_path: PathBuf,
    ) -> InitResult<Self> {
        let base_url = base_url
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();
        ensure!(
            Url::parse(&base_url)
                .is_ok_and(|url| matches!(url.scheme(), "http" | "https")),
            BackendUrlSnafu { url: base_url }
        );

        let http = reqwest::Client::builder()
            .user_agent(concat!("tenfold/", env!("CARGO_PKG_VERSION")))
            .build()
            .context(HttpClientSnafu)?;

        let session = SessionStore::open(db_path).await?;

        info!(target: LOG_TARGET, %base_url, "Client ready");
        Ok(Self {
            http,
            base_url,
            session,
        })
    }
}

impl Client {
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Build a request with the scoping rules applied from a session
    /// snapshot taken right here, before any await point.
    pub(crate) fn scoped(&self, method: Method, path: &str) -> RequestBuilder {
        let scope = self.session.scope();
        scope::apply(self.http.request(method, self.url(path)), path, &scope)
    }

    /// Central response handling: 401 invalidates the session (durable
    /// state included) before the failure propagates; every other
    /// non-success status surfaces with the backend's detail message.
    pub(crate) async fn send(&self, builder: RequestBuilder) -> RequestResult<reqwest::Response> {
        let resp = builder.send().await.context(HttpSnafu)?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            warn!(target: LOG_TARGET, "Authentication failure from backend, clearing session");
            self.session.clear().await?;
            return AuthExpiredSnafu.fail();
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let detail = extract_detail(&body).unwrap_or(body);
            debug!(target: LOG_TARGET, %status, %detail, "Request rejected");
            return ApiSnafu {
                status: status.as_u16(),
                detail,
            }
            .fail();
        }

        Ok(resp)
    }

    pub(crate) async fn request_json<T>(&self, builder: RequestBuilder) -> RequestResult<T>
    where
        T: DeserializeOwned,
    {
        let resp = self.send(builder).await?;
        let body = resp.text().await.context(HttpSnafu)?;
        serde_json::from_str(&body).context(DecodeSnafu)
    }

    pub(crate) async fn fetch_json<T>(&self, method: Method, path: &str) -> RequestResult<T>
    where
        T: DeserializeOwned,
    {
        self.request_json(self.scoped(method, path)).await
    }

    pub(crate) async fn send_json<T, B>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> RequestResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request_json(self.scoped(method, path).json(body)).await
    }

    pub(crate) async fn send_no_content(&self, method: Method, path: &str) -> RequestResult<()> {
        self.send(self.scoped(method, path)).await?;
        Ok(())
    }
}

/// Pull the backend's `{"detail": "..."}` message out of an error body.
pub(crate) fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.get("detail")?.as_str().map(ToOwned::to_owned)
}
