use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Anonymous,
    Employee,
    Admin,
}

impl Role {
    /// Parse the `type` field of a persisted user record.
    pub fn from_user_type(value: &str) -> Self {
        match value {
            "Employee" => Role::Employee,
            "Admin" => Role::Admin,
            _ => Role::Anonymous,
        }
    }

    pub fn as_user_type(&self) -> &'static str {
        match self {
            Role::Anonymous => "Anonymous",
            Role::Employee => "Employee",
            Role::Admin => "Admin",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub role: Role,
    pub identity: String,
    pub token: Option<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self {
            role: Role::Anonymous,
            identity: String::new(),
            token: None,
        }
    }

    /// True only for a known role carrying a token.
    pub fn is_authenticated(&self) -> bool {
        self.role != Role::Anonymous && self.token.is_some()
    }
}

/// Review status. Values the service sends that we do not know are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReportStatus {
    Pending,
    Accepted,
    Refused,
    Other(String),
}

impl ReportStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::Accepted => "accepted",
            ReportStatus::Refused => "refused",
            ReportStatus::Other(s) => s,
        }
    }
}

impl Default for ReportStatus {
    fn default() -> Self {
        ReportStatus::Pending
    }
}

impl From<String> for ReportStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "pending" => ReportStatus::Pending,
            "accepted" => ReportStatus::Accepted,
            "refused" => ReportStatus::Refused,
            _ => ReportStatus::Other(value),
        }
    }
}

impl From<ReportStatus> for String {
    fn from(value: ReportStatus) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An expense report as exchanged with the data service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Report {
    pub id: String,
    #[serde(rename = "email")]
    pub owner_identity: String,
    #[serde(rename = "type")]
    pub category: String,
    #[serde(rename = "name")]
    pub label: String,
    pub amount: f64,
    pub date: String,
    #[serde(rename = "vat")]
    pub vat_rate: String,
    #[serde(rename = "pct")]
    pub proof_percent: i64,
    #[serde(rename = "commentary")]
    pub comment: String,
    #[serde(rename = "fileUrl")]
    pub proof_url: Option<String>,
    #[serde(rename = "fileName")]
    pub proof_file_name: Option<String>,
    pub status: ReportStatus,
    #[serde(rename = "commentAdmin", skip_serializing_if = "Option::is_none")]
    pub admin_comment: Option<String>,
}

/// A report with its date and status passed through the display formatter.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayReport {
    pub report: Report,
    pub date: String,
    pub status: String,
}

/// A file picked in the new-report form.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// The proof attached to an in-flight new report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProofFile {
    pub chosen_name: String,
    pub extension: String,
    pub accepted: bool,
    pub remote_url: Option<String>,
    pub remote_key: Option<String>,
}
