use std::path::Path;

use billed::db::{get_connection, init_db};
use billed::error::Result;
use billed::settings::{load_settings, save_settings, shellexpand_path};

pub fn run(config_dir: &Path, data_dir: Option<String>, store: Option<String>) -> Result<()> {
    let mut settings = load_settings(config_dir);
    if let Some(dir) = data_dir {
        settings.data_dir = shellexpand_path(&dir);
    }
    if let Some(store) = store {
        settings.store = store;
    }

    std::fs::create_dir_all(settings.data_path())?;
    save_settings(config_dir, &settings)?;

    println!("Data dir:   {}", settings.data_path().display());
    match settings.store_path() {
        Some(db_path) => {
            let conn = get_connection(&db_path)?;
            init_db(&conn)?;
            println!("Database:   {}", db_path.display());
        }
        None => println!("Database:   (disabled)"),
    }
    println!("Settings:   {}", config_dir.join("settings.json").display());
    Ok(())
}
