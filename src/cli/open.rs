use std::path::Path;

use billed::error::{BilledError, Result};
use billed::routes::{Location, Route};
use billed::ui::hooks;

use super::{boot, print_hook};

pub async fn run(config_dir: &Path, path: &str) -> Result<()> {
    let mut router = boot(config_dir)?;
    router.start(Location::parse(path)).await;
    print_hook(&router, hooks::ROOT);
    Ok(())
}

pub async fn proof(config_dir: &Path, id: &str) -> Result<()> {
    let mut router = boot(config_dir)?;
    router.start(Location::parse(Route::Bills.path())).await;
    if router.mounted_route() != Some(Route::Bills) {
        return Err(BilledError::Other(
            "proofs are shown on the bills screen, sign in as an employee".to_string(),
        ));
    }
    if let Some(error) = &router.state().last_error {
        return Err(BilledError::Other(error.clone()));
    }
    if !router.view_proof(id) {
        return Err(BilledError::NotFound(id.to_string()));
    }
    print_hook(&router, hooks::MODAL_EMPLOYEE);
    Ok(())
}
