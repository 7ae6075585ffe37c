use std::sync::Mutex;

use async_trait::async_trait;

use sha2::{Digest, Sha256};

use crate::error::{BilledError, Result};
use crate::models::{Report, Role};
use crate::session::issue_token;

/// A proof file sent to the store when a report is started.
#[derive(Debug, Clone)]
pub struct ProofUpload {
    pub owner_identity: String,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Identifiers handed back by `create`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedProof {
    pub remote_url: String,
    pub remote_key: String,
}

/// Full-record write: `data` is the JSON-encoded report, `selector` its id.
#[derive(Debug, Clone)]
pub struct UpdateRequest {
    pub data: String,
    pub selector: String,
}

impl UpdateRequest {
    pub fn for_report(report: &Report, selector: &str) -> Result<Self> {
        Ok(Self {
            data: serde_json::to_string(report)?,
            selector: selector.to_string(),
        })
    }
}

/// The "reports" resource of the data service.
#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Report>>;
    async fn create(&self, upload: ProofUpload) -> Result<CreatedProof>;
    async fn update(&self, request: UpdateRequest) -> Result<Report>;
}

/// What a visitor types into a login form.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub role: Role,
    pub email: String,
    pub password: String,
}

/// Salted digest of a password; the clear text is never kept.
pub fn password_digest(email: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(email.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// The "users" resource: exchanges credentials for a token.
///
/// `login` fails with `NotFound` for an unknown email, so callers can
/// register the account and retry.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<String>;
    async fn create_user(&self, credentials: &Credentials) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreCall {
    List,
    Create,
    Update,
}

#[derive(Debug, Clone)]
struct MemoryUser {
    email: String,
    role: Role,
    digest: String,
}

#[derive(Debug, Default)]
struct MemoryState {
    reports: Vec<Report>,
    users: Vec<MemoryUser>,
    calls: Vec<StoreCall>,
    next_key: u32,
}

/// An in-process store with switchable failures. Records every call in order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
    fail_list: bool,
    fail_create: bool,
    fail_update: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reports(reports: Vec<Report>) -> Self {
        let store = Self::default();
        store.lock().reports = reports;
        store
    }

    /// Make every call of this kind reject.
    pub fn failing_on(mut self, call: StoreCall) -> Self {
        match call {
            StoreCall::List => self.fail_list = true,
            StoreCall::Create => self.fail_create = true,
            StoreCall::Update => self.fail_update = true,
        }
        self
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.lock().calls.clone()
    }

    pub fn reports(&self) -> Vec<Report> {
        self.lock().reports.clone()
    }
}

#[async_trait]
impl ReportStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Report>> {
        let mut state = self.lock();
        state.calls.push(StoreCall::List);
        if self.fail_list {
            return Err(BilledError::Store("Erreur 404".to_string()));
        }
        Ok(state.reports.clone())
    }

    async fn create(&self, upload: ProofUpload) -> Result<CreatedProof> {
        let mut state = self.lock();
        state.calls.push(StoreCall::Create);
        if self.fail_create {
            return Err(BilledError::Store("Erreur API".to_string()));
        }
        state.next_key += 1;
        let key = format!("{:04}", state.next_key);
        let url = format!("https://localhost:3456/images/{key}");
        state.reports.push(Report {
            id: key.clone(),
            owner_identity: upload.owner_identity,
            proof_url: Some(url.clone()),
            proof_file_name: Some(upload.file_name),
            ..Report::default()
        });
        Ok(CreatedProof {
            remote_url: url,
            remote_key: key,
        })
    }

    async fn update(&self, request: UpdateRequest) -> Result<Report> {
        let mut state = self.lock();
        state.calls.push(StoreCall::Update);
        if self.fail_update {
            return Err(BilledError::Store("Update failed".to_string()));
        }
        let mut report: Report = serde_json::from_str(&request.data)?;
        report.id = request.selector.clone();
        match state.reports.iter_mut().find(|r| r.id == request.selector) {
            Some(slot) => *slot = report.clone(),
            None => return Err(BilledError::NotFound(request.selector)),
        }
        Ok(report)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn login(&self, credentials: &Credentials) -> Result<String> {
        let state = self.lock();
        let Some(user) = state.users.iter().find(|u| u.email == credentials.email) else {
            return Err(BilledError::NotFound(credentials.email.clone()));
        };
        if user.role != credentials.role
            || user.digest != password_digest(&credentials.email, &credentials.password)
        {
            return Err(BilledError::InvalidCredentials(credentials.email.clone()));
        }
        Ok(issue_token(&credentials.email))
    }

    async fn create_user(&self, credentials: &Credentials) -> Result<()> {
        let mut state = self.lock();
        if state.users.iter().any(|u| u.email == credentials.email) {
            return Err(BilledError::Store(format!(
                "user {} already exists",
                credentials.email
            )));
        }
        state.users.push(MemoryUser {
            email: credentials.email.clone(),
            role: credentials.role,
            digest: password_digest(&credentials.email, &credentials.password),
        });
        Ok(())
    }
}
