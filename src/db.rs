use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension};
use sha2::{Digest, Sha256};

use crate::error::{BilledError, Result};
use crate::models::{Report, ReportStatus, Role};
use crate::session::issue_token;
use crate::store::{
    password_digest, CreatedProof, Credentials, ProofUpload, ReportStore, UpdateRequest, UserStore,
};

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS reports (
    id TEXT PRIMARY KEY,
    email TEXT NOT NULL,
    type TEXT NOT NULL DEFAULT '',
    name TEXT NOT NULL DEFAULT '',
    amount REAL NOT NULL DEFAULT 0,
    date TEXT NOT NULL DEFAULT '',
    vat TEXT NOT NULL DEFAULT '',
    pct INTEGER NOT NULL DEFAULT 0,
    commentary TEXT NOT NULL DEFAULT '',
    file_url TEXT,
    file_name TEXT,
    status TEXT NOT NULL DEFAULT 'pending',
    comment_admin TEXT,
    created_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS users (
    email TEXT PRIMARY KEY,
    type TEXT NOT NULL,
    password_digest TEXT NOT NULL,
    created_at TEXT DEFAULT (datetime('now'))
);
";

const COLUMNS: &str = "id, email, type, name, amount, date, vat, pct, commentary, \
                       file_url, file_name, status, comment_admin";

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    Ok(conn)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

fn row_to_report(row: &rusqlite::Row) -> rusqlite::Result<Report> {
    let status: String = row.get(11)?;
    Ok(Report {
        id: row.get(0)?,
        owner_identity: row.get(1)?,
        category: row.get(2)?,
        label: row.get(3)?,
        amount: row.get(4)?,
        date: row.get(5)?,
        vat_rate: row.get(6)?,
        proof_percent: row.get(7)?,
        comment: row.get(8)?,
        proof_url: row.get(9)?,
        proof_file_name: row.get(10)?,
        status: ReportStatus::from(status),
        admin_comment: row.get(12)?,
    })
}

/// Reports kept in SQLite, proofs kept as files named by content hash.
///
/// An employee-scoped store only lists its owner's reports; an unscoped one
/// lists everything, the way the service answers an admin token.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    proofs_dir: PathBuf,
    owner: Option<String>,
}

impl SqliteStore {
    pub fn open(db_path: &Path, owner: Option<String>) -> Result<Self> {
        let conn = get_connection(db_path)?;
        init_db(&conn)?;
        let proofs_dir = db_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join("proofs");
        Ok(Self {
            conn: Mutex::new(conn),
            proofs_dir,
            owner,
        })
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn get(&self, id: &str) -> Result<Option<Report>> {
        let conn = self.lock();
        let report = conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM reports WHERE id = ?1"),
                [id],
                row_to_report,
            )
            .optional()?;
        Ok(report)
    }

    pub fn count(&self) -> Result<i64> {
        let conn = self.lock();
        let n = conn.query_row("SELECT count(*) FROM reports", [], |r| r.get(0))?;
        Ok(n)
    }
}

fn proof_key(upload: &ProofUpload) -> String {
    let mut hasher = Sha256::new();
    hasher.update(upload.owner_identity.as_bytes());
    hasher.update(upload.file_name.as_bytes());
    hasher.update(&upload.bytes);
    hasher.update(chrono::Utc::now().to_rfc3339().as_bytes());
    hex::encode(hasher.finalize())[..20].to_string()
}

#[async_trait]
impl ReportStore for SqliteStore {
    async fn list(&self) -> Result<Vec<Report>> {
        let conn = self.lock();
        let mut stmt = match self.owner {
            Some(_) => conn.prepare(&format!(
                "SELECT {COLUMNS} FROM reports WHERE email = ?1 ORDER BY rowid"
            ))?,
            None => conn.prepare(&format!("SELECT {COLUMNS} FROM reports ORDER BY rowid"))?,
        };
        let rows = match &self.owner {
            Some(owner) => stmt
                .query_map([owner], row_to_report)?
                .collect::<rusqlite::Result<Vec<_>>>()?,
            None => stmt
                .query_map([], row_to_report)?
                .collect::<rusqlite::Result<Vec<_>>>()?,
        };
        Ok(rows)
    }

    async fn create(&self, upload: ProofUpload) -> Result<CreatedProof> {
        let key = proof_key(&upload);
        std::fs::create_dir_all(&self.proofs_dir)?;
        let proof_path = self.proofs_dir.join(&key);
        std::fs::write(&proof_path, &upload.bytes)?;
        let url = format!("file://{}", proof_path.to_string_lossy());

        let conn = self.lock();
        conn.execute(
            "INSERT INTO reports (id, email, file_url, file_name, status) \
             VALUES (?1, ?2, ?3, ?4, 'pending')",
            rusqlite::params![key, upload.owner_identity, url, upload.file_name],
        )?;
        Ok(CreatedProof {
            remote_url: url,
            remote_key: key,
        })
    }

    async fn update(&self, request: UpdateRequest) -> Result<Report> {
        let mut report: Report = serde_json::from_str(&request.data)?;
        report.id = request.selector.clone();

        let conn = self.lock();
        let changed = conn.execute(
            "UPDATE reports SET email = ?2, type = ?3, name = ?4, amount = ?5, date = ?6, \
             vat = ?7, pct = ?8, commentary = ?9, file_url = ?10, file_name = ?11, \
             status = ?12, comment_admin = ?13 WHERE id = ?1",
            rusqlite::params![
                report.id,
                report.owner_identity,
                report.category,
                report.label,
                report.amount,
                report.date,
                report.vat_rate,
                report.proof_percent,
                report.comment,
                report.proof_url,
                report.proof_file_name,
                report.status.as_str(),
                report.admin_comment,
            ],
        )?;
        drop(conn);
        if changed == 0 {
            return Err(BilledError::NotFound(request.selector));
        }
        self.get(&request.selector)?
            .ok_or(BilledError::NotFound(request.selector))
    }
}

#[async_trait]
impl UserStore for SqliteStore {
    async fn login(&self, credentials: &Credentials) -> Result<String> {
        let conn = self.lock();
        let row: Option<(String, String)> = conn
            .query_row(
                "SELECT type, password_digest FROM users WHERE email = ?1",
                [&credentials.email],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .optional()?;
        let Some((user_type, digest)) = row else {
            return Err(BilledError::NotFound(credentials.email.clone()));
        };
        if Role::from_user_type(&user_type) != credentials.role
            || digest != password_digest(&credentials.email, &credentials.password)
        {
            return Err(BilledError::InvalidCredentials(credentials.email.clone()));
        }
        Ok(issue_token(&credentials.email))
    }

    async fn create_user(&self, credentials: &Credentials) -> Result<()> {
        let conn = self.lock();
        conn.execute(
            "INSERT INTO users (email, type, password_digest) VALUES (?1, ?2, ?3)",
            rusqlite::params![
                credentials.email,
                credentials.role.as_user_type(),
                password_digest(&credentials.email, &credentials.password),
            ],
        )?;
        Ok(())
    }
}
