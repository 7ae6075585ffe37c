use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::error::{BilledError, Result};
use crate::models::{ProofFile, Report, ReportStatus, SelectedFile};
use crate::proof::{classify, extension};
use crate::routes::{Outcome, Route};
use crate::store::{CreatedProof, ProofUpload, ReportStore, UpdateRequest};
use crate::ui::{hooks, Ui};

pub const DEFAULT_PCT: i64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewBillState {
    Empty,
    FileRejected,
    FileAccepted,
    Submitting,
    Committed,
    CommitFailed,
}

/// Browsers hand over `C:\fakepath\name.png`; keep the last segment.
fn base_name(path: &str) -> &str {
    path.rsplit(['\\', '/']).next().unwrap_or(path)
}

/// Build a pending report from the form. Missing or unparsable fields default.
pub fn read_form(ui: &dyn Ui, owner: &str) -> Report {
    let field = |hook: &str| ui.read_value(hook).unwrap_or_default();
    let pct = field(hooks::PCT)
        .trim()
        .parse::<i64>()
        .ok()
        .filter(|p| *p != 0)
        .unwrap_or(DEFAULT_PCT);
    Report {
        owner_identity: owner.to_string(),
        category: field(hooks::EXPENSE_TYPE),
        label: field(hooks::EXPENSE_NAME),
        amount: field(hooks::AMOUNT).trim().parse().unwrap_or(0.0),
        date: field(hooks::DATE),
        vat_rate: field(hooks::VAT),
        proof_percent: pct,
        comment: field(hooks::COMMENTARY),
        status: ReportStatus::Pending,
        ..Report::default()
    }
}

/// One new-report form: stage a proof, then create and finalize the record.
pub struct NewReportPipeline {
    store: Option<Arc<dyn ReportStore>>,
    owner: String,
    state: NewBillState,
    proof: Option<ProofFile>,
    // Bytes kept until an upload succeeds so submission can create it.
    unsent: Option<SelectedFile>,
}

impl NewReportPipeline {
    pub fn new(store: Option<Arc<dyn ReportStore>>, owner: &str) -> Self {
        Self {
            store,
            owner: owner.to_string(),
            state: NewBillState::Empty,
            proof: None,
            unsent: None,
        }
    }

    pub fn state(&self) -> NewBillState {
        self.state
    }

    pub fn proof(&self) -> Option<&ProofFile> {
        self.proof.as_ref()
    }

    pub async fn select_file(&mut self, ui: &mut dyn Ui, file: Option<SelectedFile>) {
        let Some(mut file) = file else {
            return;
        };
        file.name = base_name(&file.name).to_string();

        let verdict = classify(Some(&file.name));
        if !verdict.accepted {
            debug!(file = %file.name, "proof rejected");
            ui.set_content(hooks::FILE_ERROR, verdict.message);
            if ui.query(hooks::FILE) {
                ui.set_value(hooks::FILE, "");
            }
            self.proof = None;
            self.unsent = None;
            self.state = NewBillState::FileRejected;
            return;
        }

        ui.set_content(hooks::FILE_ERROR, "");
        self.proof = Some(ProofFile {
            chosen_name: file.name.clone(),
            extension: extension(&file.name),
            accepted: true,
            remote_url: None,
            remote_key: None,
        });
        self.state = NewBillState::FileAccepted;

        let Some(store) = self.store.clone() else {
            warn!("no data store configured, proof stays local");
            self.unsent = Some(file);
            return;
        };
        let upload = ProofUpload {
            owner_identity: self.owner.clone(),
            file_name: file.name.clone(),
            bytes: file.bytes.clone(),
        };
        match store.create(upload).await {
            Ok(created) => {
                debug!(key = %created.remote_key, "proof uploaded");
                if let Some(proof) = self.proof.as_mut() {
                    proof.remote_url = Some(created.remote_url);
                    proof.remote_key = Some(created.remote_key);
                }
                self.unsent = None;
            }
            Err(e) => {
                error!(error = %e, file = %file.name, "proof upload failed");
                self.unsent = Some(file);
            }
        }
    }

    /// Phase one: the staged create result, or a create issued now.
    async fn created(&self, store: &dyn ReportStore) -> Result<CreatedProof> {
        if let Some(ProofFile {
            remote_url: Some(url),
            remote_key: Some(key),
            ..
        }) = &self.proof
        {
            return Ok(CreatedProof {
                remote_url: url.clone(),
                remote_key: key.clone(),
            });
        }
        let upload = match &self.unsent {
            Some(file) => ProofUpload {
                owner_identity: self.owner.clone(),
                file_name: file.name.clone(),
                bytes: file.bytes.clone(),
            },
            None => ProofUpload {
                owner_identity: self.owner.clone(),
                file_name: String::new(),
                bytes: Vec::new(),
            },
        };
        store.create(upload).await
    }

    async fn commit(&self, store: &dyn ReportStore, mut report: Report) -> Result<Report> {
        let created = self.created(store).await?;
        report.proof_url = Some(created.remote_url);
        report.proof_file_name = self.proof.as_ref().map(|p| p.chosen_name.clone());
        let request = UpdateRequest::for_report(&report, &created.remote_key)?;
        store.update(request).await
    }

    /// Read the form and write it. Failures leave the form exactly as it was.
    pub async fn submit(&mut self, ui: &dyn Ui) -> Outcome {
        self.state = NewBillState::Submitting;
        let report = read_form(ui, &self.owner);

        let Some(store) = self.store.clone() else {
            warn!(error = %BilledError::MissingStore, "cannot submit report");
            self.state = NewBillState::CommitFailed;
            return Outcome::Stay;
        };
        match self.commit(store.as_ref(), report).await {
            Ok(saved) => {
                info!(id = %saved.id, "report submitted");
                self.state = NewBillState::Committed;
                self.proof = None;
                self.unsent = None;
                Outcome::Navigate(Route::Bills)
            }
            Err(e) => {
                error!(error = %e, "report submission failed");
                self.state = NewBillState::CommitFailed;
                Outcome::Stay
            }
        }
    }
}
