use std::path::Path;

use billed::error::{BilledError, Result};
use billed::models::SelectedFile;
use billed::new_bill::NewBillState;
use billed::routes::{Location, Route};
use billed::ui::{hooks, Ui};

use super::{boot, print_hook, NewArgs};

pub async fn run(config_dir: &Path, form: NewArgs) -> Result<()> {
    let bytes = std::fs::read(&form.file)?;
    let mut router = boot(config_dir)?;
    router.start(Location::parse(Route::NewBill.path())).await;
    if router.mounted_route() != Some(Route::NewBill) {
        return Err(BilledError::Other(
            "new reports are sent from an employee session".to_string(),
        ));
    }

    let ui = router.ui_mut();
    ui.set_value(hooks::EXPENSE_TYPE, &form.expense_type);
    ui.set_value(hooks::EXPENSE_NAME, &form.name);
    ui.set_value(hooks::AMOUNT, &form.amount);
    ui.set_value(hooks::DATE, &form.date);
    ui.set_value(hooks::VAT, &form.vat);
    ui.set_value(hooks::PCT, form.pct.as_deref().unwrap_or_default());
    ui.set_value(hooks::COMMENTARY, form.commentary.as_deref().unwrap_or_default());

    let name = form.file.to_string_lossy().to_string();
    router.select_file(Some(SelectedFile { name, bytes })).await;
    if router.new_bill_state() == Some(NewBillState::FileRejected) {
        let message = router.ui().content(hooks::FILE_ERROR).to_string();
        return Err(BilledError::Other(message));
    }

    router.submit_new_bill().await;
    if router.mounted_route() != Some(Route::Bills) {
        return Err(BilledError::Other("report was not saved".to_string()));
    }
    println!("Report sent.");
    print_hook(&router, hooks::ROOT);
    Ok(())
}
