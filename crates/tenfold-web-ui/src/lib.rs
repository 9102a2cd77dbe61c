//! Server-rendered web console for the tenfold CRM backend.
//!
//! A local, single-operator tool: the process holds the one session (in
//! [`tenfold_client::Client`]) and renders plain HTML forms and tables
//! over it. Anything decisional (who may see what, which tenant a request
//! touches) already happened in the client crate or happens in the
//! backend; this crate is markup and redirects.

mod error;
mod layout;
mod routes;
mod serde_util;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr as _;
use std::sync::Arc;
use std::{io, net};

use axum::Router;
use snafu::{ResultExt as _, Snafu};
use tenfold_client::{Client, Session};
use tokio::net::{TcpListener, TcpSocket};
use tokio::signal;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tracing::info;

pub(crate) const LOG_TARGET: &str = "tenfold::web_ui";

fn default_assets_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets")
}

#[derive(Clone, Debug)]
pub struct Opts {
    pub listen: String,
    assets_dir: PathBuf,
}

impl Opts {
    pub fn new(listen: String, assets_dir: Option<PathBuf>) -> Self {
        Self {
            listen,
            assets_dir: assets_dir.unwrap_or_else(default_assets_dir),
        }
    }

    pub fn assets_dir(&self) -> &Path {
        &self.assets_dir
    }
}

pub struct UiState {
    client: Client,
}

impl UiState {
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Current session snapshot, one lock acquisition.
    pub fn session(&self) -> Session {
        self.client.session().snapshot()
    }
}

pub type SharedState = Arc<UiState>;

#[derive(Debug, Snafu)]
pub enum WebUiServerError {
    #[snafu(transparent)]
    Io { source: io::Error },

    ListenAddr { source: net::AddrParseError },
}

pub type ServerResult<T> = std::result::Result<T, WebUiServerError>;

pub struct Server {
    listener: TcpListener,
    state: SharedState,
    opts: Opts,
}

impl Server {
    pub async fn init(opts: Opts, client: Client) -> ServerResult<Server> {
        let listener = Self::get_listener(&opts).await?;

        let state = Arc::new(UiState { client });

        info!(target: LOG_TARGET, "Listening on {}", listener.local_addr()?);
        Ok(Self {
            listener,
            state,
            opts,
        })
    }

    async fn get_listener(opts: &Opts) -> ServerResult<TcpListener> {
        let addr = SocketAddr::from_str(&opts.listen).context(ListenAddrSnafu)?;

        let socket = if addr.is_ipv4() {
            TcpSocket::new_v4()?
        } else {
            TcpSocket::new_v6()?
        };
        socket.set_nodelay(true)?;
        socket.bind(addr)?;

        Ok(socket.listen(1024)?)
    }

    pub async fn run(self) -> ServerResult<()> {
        let router = Router::new()
            .merge(routes::route_handler(self.state.clone()))
            .nest_service("/assets", ServeDir::new(self.opts.assets_dir()));

        info!(target: LOG_TARGET, "Starting server");
        axum::serve(self.listener, router.layer(CompressionLayer::new()))
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }

    pub fn addr(&self) -> ServerResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
