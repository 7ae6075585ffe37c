pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

pub const REJECTION_MESSAGE: &str = "Seuls les fichiers jpg, jpeg et png sont acceptés.";
pub const MISSING_PROOF_MESSAGE: &str = "Fichier justificatif manquant ou au mauvais format";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub accepted: bool,
    pub message: &'static str,
}

/// Lowercased substring after the final `.`; empty when the name has no dot.
pub fn extension(file_name: &str) -> String {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default()
}

/// Decide whether a proof file may be attached, keyed off its name only.
pub fn classify(file_name: Option<&str>) -> Classification {
    let accepted = match file_name.map(str::trim) {
        Some(name) if !name.is_empty() => ALLOWED_EXTENSIONS.contains(&extension(name).as_str()),
        _ => false,
    };
    Classification {
        accepted,
        message: if accepted { "" } else { REJECTION_MESSAGE },
    }
}

/// What the proof modal shows for a stored report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProofPanel {
    Image { url: String },
    Missing,
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty() && *v != "null")
}

/// Stored URLs may be opaque, so the extension check uses the stored file name.
pub fn proof_panel(url: Option<&str>, file_name: Option<&str>) -> ProofPanel {
    match (present(url), present(file_name)) {
        (Some(url), Some(name)) if classify(Some(name)).accepted => ProofPanel::Image {
            url: url.to_string(),
        },
        _ => ProofPanel::Missing,
    }
}
