use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::Result;
use crate::fmt::{format_date, format_status};
use crate::models::{DisplayReport, Report};
use crate::store::ReportStore;

/// A record whose date could not be formatted and was kept raw.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatFault {
    pub report_id: String,
    pub raw_date: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Listing {
    pub reports: Vec<DisplayReport>,
    pub faults: Vec<FormatFault>,
}

/// Format one record. Never fails: a bad date is kept as-is and reported.
pub fn to_display(report: Report) -> (DisplayReport, Option<FormatFault>) {
    let status = format_status(report.status.as_str());
    match format_date(&report.date) {
        Ok(date) => (
            DisplayReport {
                report,
                date,
                status,
            },
            None,
        ),
        Err(e) => {
            let fault = FormatFault {
                report_id: report.id.clone(),
                raw_date: report.date.clone(),
                reason: e.to_string(),
            };
            (
                DisplayReport {
                    date: report.date.clone(),
                    report,
                    status,
                },
                Some(fault),
            )
        }
    }
}

/// Fetches the employee's reports and normalizes them for display.
pub struct ReportListPipeline {
    store: Option<Arc<dyn ReportStore>>,
}

impl ReportListPipeline {
    pub fn new(store: Option<Arc<dyn ReportStore>>) -> Self {
        Self { store }
    }

    /// `Ok(None)` means no store is configured, which is not the same as zero reports.
    pub async fn list(&self) -> Result<Option<Listing>> {
        let Some(store) = &self.store else {
            warn!("no data store configured, cannot list reports");
            return Ok(None);
        };
        let snapshot = store.list().await?;

        let mut listing = Listing::default();
        for report in snapshot {
            let (row, fault) = to_display(report);
            if let Some(fault) = fault {
                warn!(
                    report = ?row.report,
                    reason = %fault.reason,
                    "malformed date, keeping raw value"
                );
                listing.faults.push(fault);
            }
            listing.reports.push(row);
        }
        debug!(count = listing.reports.len(), "reports listed");
        Ok(Some(listing))
    }
}
