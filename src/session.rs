use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::models::{Role, Session};
use crate::storage::Storage;

pub const USER_KEY: &str = "user";
pub const TOKEN_KEY: &str = "jwt";

/// The persisted user record, as written at sign-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserRecord {
    #[serde(rename = "type")]
    user_type: String,
    email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status: Option<String>,
}

/// Read the session from storage. Anything absent or malformed is anonymous.
pub fn resolve(storage: &dyn Storage) -> Session {
    let Some(raw) = storage.get(USER_KEY) else {
        return Session::anonymous();
    };
    let Some(token) = storage.get(TOKEN_KEY).filter(|t| !t.is_empty()) else {
        return Session::anonymous();
    };
    let Ok(user) = serde_json::from_str::<UserRecord>(&raw) else {
        return Session::anonymous();
    };
    let role = Role::from_user_type(&user.user_type);
    if role == Role::Anonymous {
        return Session::anonymous();
    }
    Session {
        role,
        identity: user.email,
        token: Some(token),
    }
}

/// Persist a connected user and the token the user store handed back.
pub fn sign_in(storage: &mut dyn Storage, role: Role, email: &str, token: &str) -> Result<()> {
    let user = UserRecord {
        user_type: role.as_user_type().to_string(),
        email: email.to_string(),
        status: Some("connected".to_string()),
    };
    storage.set(USER_KEY, &serde_json::to_string(&user)?)?;
    storage.set(TOKEN_KEY, token)?;
    Ok(())
}

pub fn sign_out(storage: &mut dyn Storage) -> Result<()> {
    storage.remove(USER_KEY)?;
    storage.remove(TOKEN_KEY)
}

/// An opaque session token: digest of the email and the current time.
pub fn issue_token(email: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(email.as_bytes());
    hasher.update(chrono::Utc::now().to_rfc3339().as_bytes());
    hex::encode(hasher.finalize())
}
