use std::path::Path;

use billed::error::{BilledError, Result};
use billed::routes::{Location, Route};
use billed::ui::{hooks, Document, Ui};
use billed::Router;

use super::{boot, print_hook};

async fn dashboard(config_dir: &Path) -> Result<Router<Document>> {
    let mut router = boot(config_dir)?;
    router.start(Location::parse(Route::Dashboard.path())).await;
    if router.mounted_route() != Some(Route::Dashboard) {
        return Err(BilledError::Other(
            "the review dashboard needs an admin session".to_string(),
        ));
    }
    if let Some(error) = &router.state().last_error {
        return Err(BilledError::Other(error.clone()));
    }
    Ok(router)
}

pub async fn list(config_dir: &Path) -> Result<()> {
    let mut router = dashboard(config_dir).await?;
    print_hook(&router, hooks::ROOT);
    for bucket in 1..=3 {
        router.toggle_bucket(bucket);
        println!();
        print_hook(&router, &hooks::bucket_container(bucket));
    }
    Ok(())
}

pub async fn show(config_dir: &Path, id: &str) -> Result<()> {
    let mut router = dashboard(config_dir).await?;
    if router.select_report(id).is_none() {
        return Err(BilledError::NotFound(id.to_string()));
    }
    print_hook(&router, hooks::DASHBOARD_RIGHT);
    router.show_admin_proof();
    println!();
    print_hook(&router, hooks::MODAL_ADMIN);
    Ok(())
}

pub async fn accept(config_dir: &Path, id: &str, comment: Option<&str>) -> Result<()> {
    decide(config_dir, id, comment, true).await
}

pub async fn refuse(config_dir: &Path, id: &str, comment: Option<&str>) -> Result<()> {
    decide(config_dir, id, comment, false).await
}

async fn decide(config_dir: &Path, id: &str, comment: Option<&str>, accept: bool) -> Result<()> {
    let mut router = dashboard(config_dir).await?;
    if router.select_report(id).is_none() {
        return Err(BilledError::NotFound(id.to_string()));
    }
    if let Some(comment) = comment {
        router.ui_mut().set_value(hooks::ADMIN_COMMENT, comment);
    }

    let before = router.history().len();
    if accept {
        router.accept(id).await;
    } else {
        router.refuse(id).await;
    }
    if router.history().len() == before {
        return Err(BilledError::Other(format!("could not review report {id}")));
    }
    println!("Report {id} {}.", if accept { "accepted" } else { "refused" });
    Ok(())
}
