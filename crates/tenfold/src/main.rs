mod cli;

use std::io;

use clap::Parser;
use cli::{GlobalOpts, Opts, make_web_opts};
use duct::cmd;
use snafu::{FromString, ResultExt, Snafu, Whatever};
use tenfold_client::Client;
use tenfold_client::error::{DbError, InitError, LoginError, RequestError};
use tenfold_web_ui::{Server, WebUiServerError};
use tracing::level_filters::LevelFilter;
use tracing::warn;
use tracing_subscriber::EnvFilter;

pub const LOG_TARGET: &str = "tenfold::cli";

type WhateverResult<T> = std::result::Result<T, snafu::Whatever>;

#[derive(Debug, Snafu)]
pub enum CliError {
    #[snafu(display("Initialization error: {source}"))]
    Init { source: InitError },
    #[snafu(display("WebUI Server error: {source}"))]
    WebUiServer { source: WebUiServerError },
    #[snafu(display("Login error: {source}"))]
    Login { source: LoginError },
    #[snafu(display("Request error: {source}"))]
    Request { source: RequestError },
    #[snafu(display("Session storage error: {source}"))]
    Database { source: DbError },
    #[snafu(display("Miscellaneous error: {source}"))]
    Whatever { source: Whatever },
}

pub type CliResult<T> = std::result::Result<T, CliError>;

#[snafu::report]
#[tokio::main]
async fn main() -> CliResult<()> {
    init_logging().context(WhateverSnafu)?;

    let opts = Opts::parse();
    match handle_cmd(opts).await {
        Ok(v) => {
            println!("{}", serde_json::to_string_pretty(&v).expect("Can't fail"));
            Ok(())
        }
        Err(err) => Err(err),
    }
}

async fn handle_cmd(opts: Opts) -> CliResult<serde_json::Value> {
    Ok(match opts.cmd {
        cli::OptsCmd::WebUi(ref web_opts) => {
            let client = build_client(&opts.global).await?;
            let server = Server::init(make_web_opts(web_opts), client)
                .await
                .context(WebUiServerSnafu)?;

            if !web_opts.skip_xdg_open {
                if cmd!(
                    "xdg-open",
                    format!("http://{}", server.addr().context(WebUiServerSnafu)?)
                )
                .run()
                .is_err()
                {
                    warn!(target: LOG_TARGET, "Failed to open browser");
                };
            }

            server.run().await.context(WebUiServerSnafu)?;

            serde_json::Value::Null
        }
        cli::OptsCmd::Login { email, password } => {
            let client = build_client(&opts.global).await?;
            let session = client.login(&email, &password).await.context(LoginSnafu)?;

            serde_json::json!({
                "email": session.user().map(|user| user.email.clone()),
                "is_admin": session.is_admin(),
                "tenant_id": session.tenant_id(),
            })
        }
        cli::OptsCmd::Logout => {
            let client = build_client(&opts.global).await?;
            client.logout().await.context(DatabaseSnafu)?;

            serde_json::Value::Bool(true)
        }
        cli::OptsCmd::Status => {
            let client = build_client(&opts.global).await?;
            let session = client.session().snapshot();

            serde_json::json!({
                "backend_url": client.base_url(),
                "authenticated": session.is_authenticated(),
                "is_admin": session.is_admin(),
                "user": session.user(),
                "tenant_id": session.tenant_id(),
            })
        }
        cli::OptsCmd::List(list_cmd) => {
            let client = build_client(&opts.global).await?;
            match list_cmd {
                cli::ListCmd::Contacts => {
                    serde_json::to_value(client.contacts().await.context(RequestSnafu)?)
                        .expect("Can't fail")
                }
                cli::ListCmd::Leads => {
                    serde_json::to_value(client.leads().await.context(RequestSnafu)?)
                        .expect("Can't fail")
                }
                cli::ListCmd::Opportunities => {
                    serde_json::to_value(client.opportunities().await.context(RequestSnafu)?)
                        .expect("Can't fail")
                }
                cli::ListCmd::Tenants => {
                    serde_json::to_value(client.tenants().await.context(RequestSnafu)?)
                        .expect("Can't fail")
                }
                cli::ListCmd::Users => {
                    serde_json::to_value(client.users().await.context(RequestSnafu)?)
                        .expect("Can't fail")
                }
            }
        }
    })
}

async fn build_client(global: &GlobalOpts) -> CliResult<Client> {
    Client::builder()
        .maybe_base_url(global.backend_url.clone())
        .db_path(global.data_dir().join("session.redb"))
        .build()
        .await
        .context(InitSnafu)
}

pub fn init_logging() -> WhateverResult<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .try_init()
        .map_err(|_| Whatever::without_source("Failed to initialize logging".to_string()))?;

    Ok(())
}
