use std::path::Path;

use billed::db::SqliteStore;
use billed::error::Result;
use billed::session;
use billed::settings::load_settings;
use billed::storage::FileStorage;

pub fn run(config_dir: &Path) -> Result<()> {
    let settings = load_settings(config_dir);
    let current = session::resolve(&FileStorage::open(&settings.session_path()));

    println!("Config dir: {}", config_dir.display());
    println!("Data dir:   {}", settings.data_dir);
    if current.is_authenticated() {
        println!("Session:    {} ({})", current.identity, current.role.as_user_type());
    } else {
        println!("Session:    (signed out)");
    }

    match settings.store_path() {
        Some(db_path) if db_path.exists() => {
            let store = SqliteStore::open(&db_path, None)?;
            println!("Database:   {}", db_path.display());
            println!();
            println!("Reports:    {}", store.count()?);
        }
        Some(db_path) => {
            println!("Database:   {}", db_path.display());
            println!();
            println!("Database not found. Run `billed init` to set up.");
        }
        None => println!("Database:   (disabled)"),
    }
    Ok(())
}
