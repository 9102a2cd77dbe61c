use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use clap::{Args, Parser, Subcommand};

/// Command line options for the tenfold console
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Opts {
    /// Global options that apply to all commands
    #[command(flatten)]
    pub global: GlobalOpts,

    /// The specific command to execute
    #[command(subcommand)]
    pub cmd: OptsCmd,
}

/// Global options that apply across all commands
#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Where the session database lives
    #[arg(env = "TENFOLD_DATA_DIR", long)]
    pub data_dir: Option<PathBuf>,

    /// Base url of the CRM backend REST API
    #[arg(env = "TENFOLD_BACKEND_URL", long)]
    pub backend_url: Option<String>,
}

static PROJECTS_DIR: LazyLock<directories::ProjectDirs> = LazyLock::new(|| {
    directories::ProjectDirs::from("org", "Tenfold", "tenfold")
        .expect("Unable to determine project's dir")
});

impl GlobalOpts {
    pub fn data_dir(&self) -> &Path {
        self.data_dir.as_deref().unwrap_or_else(|| {
            PROJECTS_DIR
                .state_dir()
                .unwrap_or_else(|| PROJECTS_DIR.data_local_dir())
        })
    }
}

/// Available commands for the tenfold CLI
#[derive(Debug, Subcommand)]
pub enum OptsCmd {
    /// Start the web console
    WebUi(WebUiOpts),

    /// Authenticate against the backend and persist the session
    Login {
        #[arg(long)]
        email: String,

        /// Falls back to TENFOLD_PASSWORD so the password can stay out of
        /// shell history
        #[arg(long, env = "TENFOLD_PASSWORD")]
        password: String,
    },

    /// Clear the persisted session
    Logout,

    /// Show the current session
    Status,

    /// Print resources as JSON
    #[command(subcommand)]
    List(ListCmd),
}

#[derive(Debug, Args)]
pub struct WebUiOpts {
    #[arg(long)]
    pub skip_xdg_open: bool,

    /// Listen address
    #[arg(long, short, default_value = "[::1]:0", env = "TENFOLD_LISTEN")]
    pub listen: String,

    /// Root directory of the assets dir
    #[arg(long, env = "TENFOLD_ASSETS_DIR")]
    pub assets_dir: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum ListCmd {
    Contacts,
    Leads,
    Opportunities,
    /// Superuser only
    Tenants,
    /// Superuser only
    Users,
}

pub fn make_web_opts(opts: &WebUiOpts) -> tenfold_web_ui::Opts {
    tenfold_web_ui::Opts::new(opts.listen.clone(), opts.assets_dir.clone())
}
