use std::path::Path;

use billed::error::Result;
use billed::models::Role;
use billed::settings::load_settings;
use billed::storage::FileStorage;
use billed::ui::hooks;

use super::{boot, boot_as, print_hook, RoleArg};

pub async fn run(config_dir: &Path, email: &str, role: RoleArg, password: &str) -> Result<()> {
    let settings = load_settings(config_dir);
    let role = Role::from(role);
    let storage = FileStorage::open(&settings.session_path());
    let mut router = boot_as(&settings, storage, role, email)?;
    router.login(role, email, password).await?;
    println!("Signed in as {email} ({})", role.as_user_type());
    print_hook(&router, hooks::ROOT);
    Ok(())
}

pub async fn logout(config_dir: &Path) -> Result<()> {
    let mut router = boot(config_dir)?;
    router.logout().await?;
    println!("Signed out.");
    Ok(())
}
