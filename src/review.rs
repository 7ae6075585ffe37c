use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::error::Result;
use crate::models::{Report, ReportStatus};
use crate::proof::proof_panel;
use crate::routes::{Outcome, Route};
use crate::store::{ReportStore, UpdateRequest};
use crate::ui::{hooks, Ui};
use crate::views::{Renderer, Screen};

const CARD_BACKGROUND: &str = "#0D5AE5";
const CARD_SELECTED_BACKGROUND: &str = "#2A2B35";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Disclosure {
    #[default]
    Collapsed,
    Open,
}

impl Disclosure {
    pub fn toggled(self) -> Self {
        match self {
            Disclosure::Collapsed => Disclosure::Open,
            Disclosure::Open => Disclosure::Collapsed,
        }
    }
}

/// Owners whose reports the review buckets hide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exclusion {
    /// Inspection mode: nothing hidden.
    None,
    Owners(Vec<String>),
}

impl Exclusion {
    /// The reviewer's own identity plus the configured test accounts.
    pub fn for_reviewer(identity: &str, test_accounts: &[String]) -> Self {
        let mut owners = test_accounts.to_vec();
        owners.push(identity.to_string());
        Exclusion::Owners(owners)
    }

    fn hides(&self, owner: &str) -> bool {
        match self {
            Exclusion::None => false,
            Exclusion::Owners(owners) => owners.iter().any(|o| o == owner),
        }
    }
}

/// Bucket numbers as laid out on the dashboard: 1 pending, 2 accepted, 3 refused.
pub fn get_status(bucket: usize) -> Option<ReportStatus> {
    match bucket {
        1 => Some(ReportStatus::Pending),
        2 => Some(ReportStatus::Accepted),
        3 => Some(ReportStatus::Refused),
        _ => None,
    }
}

fn visible_bills<'a>(records: &'a [Report], exclusion: &Exclusion) -> Vec<&'a Report> {
    (1..=3)
        .filter_map(get_status)
        .flat_map(|status| filtered_bills(records, &status, exclusion))
        .collect()
}

pub fn filtered_bills<'a>(
    records: &'a [Report],
    status: &ReportStatus,
    exclusion: &Exclusion,
) -> Vec<&'a Report> {
    records
        .iter()
        .filter(|r| &r.status == status && !exclusion.hides(&r.owner_identity))
        .collect()
}

/// The admin dashboard: status buckets, one open record, and decisions on it.
pub struct ReviewPipeline {
    store: Option<Arc<dyn ReportStore>>,
    reports: Vec<Report>,
    exclusion: Exclusion,
    buckets: HashMap<usize, Disclosure>,
    selected: Option<(String, Disclosure)>,
}

impl ReviewPipeline {
    pub fn new(store: Option<Arc<dyn ReportStore>>, exclusion: Exclusion) -> Self {
        Self {
            store,
            reports: Vec::new(),
            exclusion,
            buckets: HashMap::new(),
            selected: None,
        }
    }

    /// Every owner's reports, unformatted. `Ok(None)` when no store is configured.
    pub async fn get_all(&self) -> Result<Option<Vec<Report>>> {
        let Some(store) = &self.store else {
            warn!("no data store configured, cannot list reports");
            return Ok(None);
        };
        let reports = store.list().await?;
        debug!(count = reports.len(), "dashboard reports fetched");
        Ok(Some(reports))
    }

    pub fn set_reports(&mut self, reports: Vec<Report>) {
        self.reports = reports;
        self.buckets.clear();
        self.selected = None;
    }

    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    /// Per-bucket count of the cards the reviewer can actually open.
    pub fn bucket_counts(&self) -> [usize; 3] {
        [1, 2, 3].map(|bucket| {
            get_status(bucket)
                .map(|status| filtered_bills(&self.reports, &status, &self.exclusion).len())
                .unwrap_or_default()
        })
    }

    pub fn bucket_state(&self, bucket: usize) -> Disclosure {
        self.buckets.get(&bucket).copied().unwrap_or_default()
    }

    pub fn selected(&self) -> Option<(&str, Disclosure)> {
        self.selected.as_ref().map(|(id, d)| (id.as_str(), *d))
    }

    /// Open or collapse one status bucket. Buckets flip independently.
    pub fn toggle_bucket(
        &mut self,
        ui: &mut dyn Ui,
        renderer: &dyn Renderer,
        bucket: usize,
    ) -> Option<Disclosure> {
        let status = get_status(bucket)?;
        let next = self.bucket_state(bucket).toggled();
        self.buckets.insert(bucket, next);

        let arrow = hooks::arrow_icon(bucket);
        let container = hooks::bucket_container(bucket);
        match next {
            Disclosure::Open => {
                let cards = filtered_bills(&self.reports, &status, &self.exclusion);
                ui.set_style(&arrow, &[("transform", "rotate(0deg)")]);
                ui.set_content(&container, &renderer.render(&Screen::Cards(&cards)));
            }
            Disclosure::Collapsed => {
                ui.set_style(&arrow, &[("transform", "rotate(90deg)")]);
                ui.set_content(&container, "");
            }
        }
        Some(next)
    }

    /// Selecting the open record collapses it; selecting another one opens that one.
    pub fn select_report(
        &mut self,
        ui: &mut dyn Ui,
        renderer: &dyn Renderer,
        id: &str,
    ) -> Option<Disclosure> {
        let visible = visible_bills(&self.reports, &self.exclusion);
        let report = visible.iter().copied().find(|r| r.id == id)?;

        let next = match &self.selected {
            Some((current, state)) if current == id => state.toggled(),
            _ => Disclosure::Open,
        };

        match next {
            Disclosure::Open => {
                for r in &visible {
                    ui.set_style(&hooks::open_bill(&r.id), &[("background", CARD_BACKGROUND)]);
                }
                ui.set_style(
                    &hooks::open_bill(id),
                    &[("background", CARD_SELECTED_BACKGROUND)],
                );
                ui.set_content(
                    hooks::DASHBOARD_RIGHT,
                    &renderer.render(&Screen::ReportForm(report)),
                );
                ui.set_style(hooks::VERTICAL_NAVBAR, &[("height", "150vh")]);
            }
            Disclosure::Collapsed => {
                ui.set_style(&hooks::open_bill(id), &[("background", CARD_BACKGROUND)]);
                ui.set_content(
                    hooks::DASHBOARD_RIGHT,
                    &renderer.render(&Screen::BigBilledIcon),
                );
                ui.set_style(hooks::VERTICAL_NAVBAR, &[("height", "120vh")]);
            }
        }
        self.selected = Some((id.to_string(), next));
        Some(next)
    }

    /// Show the open record's proof in the admin modal.
    pub fn show_proof(&self, ui: &mut dyn Ui, renderer: &dyn Renderer) -> bool {
        let Some((id, Disclosure::Open)) = &self.selected else {
            return false;
        };
        let Some(report) = self.reports.iter().find(|r| &r.id == id) else {
            return false;
        };
        let panel = proof_panel(report.proof_url.as_deref(), report.proof_file_name.as_deref());
        ui.set_content(hooks::MODAL_ADMIN, &renderer.render(&Screen::Proof(&panel)));
        true
    }

    pub async fn accept(&self, ui: &dyn Ui, id: &str) -> Outcome {
        self.decide(ui, id, ReportStatus::Accepted).await
    }

    pub async fn refuse(&self, ui: &dyn Ui, id: &str) -> Outcome {
        self.decide(ui, id, ReportStatus::Refused).await
    }

    /// One full-record update. The local snapshot is not touched; the
    /// dashboard re-fetches after a successful write.
    async fn decide(&self, ui: &dyn Ui, id: &str, status: ReportStatus) -> Outcome {
        let Some(store) = &self.store else {
            warn!(id, "no data store configured, decision not saved");
            return Outcome::Stay;
        };
        if self.selected() != Some((id, Disclosure::Open)) {
            warn!(id, "decision on a report that is not open");
            return Outcome::Stay;
        }
        let visible = visible_bills(&self.reports, &self.exclusion);
        let Some(report) = visible.into_iter().find(|r| r.id == id) else {
            warn!(id, "decision on a hidden or unknown report");
            return Outcome::Stay;
        };
        let decided = Report {
            status: status.clone(),
            admin_comment: ui.read_value(hooks::ADMIN_COMMENT),
            ..report.clone()
        };
        let request = match UpdateRequest::for_report(&decided, id) {
            Ok(request) => request,
            Err(e) => {
                error!(error = %e, id, "could not encode decision");
                return Outcome::Stay;
            }
        };
        match store.update(request).await {
            Ok(_) => {
                info!(id, status = %status, "report reviewed");
                Outcome::Navigate(Route::Dashboard)
            }
            Err(e) => {
                error!(error = %e, id, status = %status, "review update failed");
                Outcome::Stay
            }
        }
    }
}
