use std::io;

use snafu::{Location, Snafu};
use tokio::task::JoinError;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum DbError {
    Database {
        source: redb::DatabaseError,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(transparent)]
    Table {
        source: redb::TableError,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(transparent)]
    Storage {
        source: redb::StorageError,
        #[snafu(implicit)]
        location: Location,
    },
    Transaction {
        source: redb::TransactionError,
        #[snafu(implicit)]
        location: Location,
    },
    Commit {
        source: redb::CommitError,
        #[snafu(implicit)]
        location: Location,
    },
    CreateDir {
        source: io::Error,
        #[snafu(implicit)]
        location: Location,
    },
    Join {
        source: JoinError,
        #[snafu(implicit)]
        location: Location,
    },
}

pub type DbResult<T> = std::result::Result<T, DbError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum InitError {
    #[snafu(display("Invalid backend url: {url}"))]
    BackendUrl { url: String },
    #[snafu(display("HTTP client initialization error"))]
    HttpClient { source: reqwest::Error },
    #[snafu(transparent)]
    Db { source: DbError },
}

pub type InitResult<T> = std::result::Result<T, InitError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum LoginError {
    /// The backend rejected the login; `detail` is its message, or a
    /// generic fallback when it sent none.
    #[snafu(display("{detail}"))]
    Rejected { detail: String },
    #[snafu(display("Email and password must not be empty"))]
    EmptyCredentials,
    #[snafu(display("Login request failed"))]
    Transport { source: reqwest::Error },
    #[snafu(display("Malformed login response"))]
    MalformedResponse { source: serde_json::Error },
    #[snafu(display("Login response carried an empty access token"))]
    EmptyToken,
    #[snafu(transparent)]
    Db { source: DbError },
}

pub type LoginResult<T> = std::result::Result<T, LoginError>;

impl LoginError {
    /// Message fit for the sign-in form. Server-provided detail when the
    /// backend rejected the credentials, a generic line for everything
    /// else (transport errors carry nothing a user can act on).
    pub fn user_message(&self) -> String {
        match self {
            LoginError::Rejected { detail } => detail.clone(),
            _ => crate::api::GENERIC_LOGIN_FAILURE.to_owned(),
        }
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum RequestError {
    /// The backend answered 401. The session has already been torn down by
    /// the time callers see this; all that is left for them is to land the
    /// user on the sign-in screen.
    #[snafu(display("Session expired, sign in again"))]
    AuthExpired,
    #[snafu(display("Backend returned {status}: {detail}"))]
    Api { status: u16, detail: String },
    #[snafu(display("Request failed"))]
    Http { source: reqwest::Error },
    #[snafu(display("Malformed response body"))]
    Decode { source: serde_json::Error },
    #[snafu(transparent)]
    Db { source: DbError },
}

pub type RequestResult<T> = std::result::Result<T, RequestError>;
