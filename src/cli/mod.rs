pub mod init;
pub mod login;
pub mod new;
pub mod open;
pub mod review;
pub mod status;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand, ValueEnum};

use billed::db::SqliteStore;
use billed::error::Result;
use billed::models::Role;
use billed::session;
use billed::settings::{default_config_dir, load_settings, Settings};
use billed::storage::{FileStorage, Storage};
use billed::store::{ReportStore, UserStore};
use billed::ui::Document;
use billed::views::TextRenderer;
use billed::Router;

#[derive(Parser)]
#[command(name = "billed", about = "File expense reports, and review them as an admin.")]
pub struct Cli {
    /// Directory holding settings.json (default: ~/.config/billed)
    #[arg(long = "config-dir", env = "BILLED_CONFIG_DIR", global = true)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn config_dir(&self) -> PathBuf {
        self.config_dir.clone().unwrap_or_else(default_config_dir)
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum RoleArg {
    Employee,
    Admin,
}

impl From<RoleArg> for Role {
    fn from(value: RoleArg) -> Self {
        match value {
            RoleArg::Employee => Role::Employee,
            RoleArg::Admin => Role::Admin,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Choose a data directory and create the report database.
    Init {
        /// Path for billed data (default: ~/Documents/billed)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
        /// Database file name inside the data directory; empty disables it
        #[arg(long)]
        store: Option<String>,
    },
    /// Sign in and open your home screen.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, value_enum)]
        role: RoleArg,
        #[arg(long)]
        password: String,
    },
    /// Sign out.
    Logout,
    /// Show settings, session and database info.
    Status,
    /// Open a screen by address, e.g. `#employee/bills`.
    Open {
        #[arg(default_value = "/")]
        path: String,
    },
    /// Show the proof attached to one of your reports.
    Proof { id: String },
    /// Send a new expense report.
    New(NewArgs),
    /// Review reports as an admin.
    Review {
        #[command(subcommand)]
        command: ReviewCommands,
    },
}

#[derive(Args)]
pub struct NewArgs {
    /// Receipt image (jpg, jpeg or png)
    #[arg(long)]
    pub file: PathBuf,
    #[arg(long = "type")]
    pub expense_type: String,
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub amount: String,
    /// YYYY-MM-DD
    #[arg(long)]
    pub date: String,
    #[arg(long)]
    pub vat: String,
    #[arg(long)]
    pub pct: Option<String>,
    #[arg(long)]
    pub commentary: Option<String>,
}

#[derive(Subcommand)]
pub enum ReviewCommands {
    /// List reports by status bucket.
    List,
    /// Show one report and its proof.
    Show { id: String },
    /// Accept a report.
    Accept {
        id: String,
        #[arg(long)]
        comment: Option<String>,
    },
    /// Refuse a report.
    Refuse {
        id: String,
        #[arg(long)]
        comment: Option<String>,
    },
}

pub(crate) fn open_store(
    settings: &Settings,
    owner: Option<String>,
) -> Result<Option<Arc<SqliteStore>>> {
    let Some(path) = settings.store_path() else {
        return Ok(None);
    };
    std::fs::create_dir_all(settings.data_path())?;
    Ok(Some(Arc::new(SqliteStore::open(&path, owner)?)))
}

/// Employees only ever see their own reports; admins see everyone's.
fn scope_for(role: Role, identity: &str) -> Option<String> {
    match role {
        Role::Employee => Some(identity.to_string()),
        Role::Admin | Role::Anonymous => None,
    }
}

/// Build a router over the persisted session, scoped to whoever is signed in.
pub(crate) fn boot(config_dir: &Path) -> Result<Router<Document>> {
    let settings = load_settings(config_dir);
    let storage = FileStorage::open(&settings.session_path());
    let current = session::resolve(&storage);
    boot_as(&settings, storage, current.role, &current.identity)
}

pub(crate) fn boot_as(
    settings: &Settings,
    storage: impl Storage + 'static,
    role: Role,
    identity: &str,
) -> Result<Router<Document>> {
    let store = open_store(settings, scope_for(role, identity))?;
    let reports = store.clone().map(|s| s as Arc<dyn ReportStore>);
    let users = store.map(|s| s as Arc<dyn UserStore>);
    Ok(
        Router::new(Document::new(), Box::new(storage), Box::new(TextRenderer))
            .with_store(reports)
            .with_users(users)
            .with_settings(settings),
    )
}

pub(crate) fn print_hook(router: &Router<Document>, hook: &str) {
    let content = router.ui().content(hook);
    if !content.is_empty() {
        println!("{content}");
    }
}
