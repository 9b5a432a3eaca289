//! Record, search, and directory payloads returned by the remote API.
//!
//! Fields the dashboards do not depend on are optional so that additive
//! server changes never break decoding.

use serde::{Deserialize, Serialize};

/// A medical record as listed by `GET /records/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSummary {
    /// Record identifier.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Owning patient.
    #[serde(default)]
    pub patient_id: Option<String>,
    /// File category (`pdf`, `image`, `dicom`, `report`).
    #[serde(default)]
    pub file_type: Option<String>,
    /// Storage URL of the file.
    #[serde(default)]
    pub file_url: Option<String>,
    /// Upload timestamp as sent by the server.
    #[serde(default)]
    pub upload_date: Option<String>,
    /// Processing status.
    #[serde(default)]
    pub status: Option<String>,
}

/// One semantic search match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Record the match belongs to.
    #[serde(default)]
    pub record_id: Option<String>,
    /// Title of the matching record.
    #[serde(alias = "title")]
    pub record_title: String,
    /// Cosine similarity in `0.0..=1.0`.
    pub relevance_score: f64,
    /// Matching excerpt.
    #[serde(alias = "excerpt", default)]
    pub matched_text: String,
}

impl SearchHit {
    /// Relevance as a percentage with one decimal (e.g. `87.5`).
    #[must_use]
    pub fn relevance_percent(&self) -> f64 {
        (self.relevance_score * 1000.0).round() / 10.0
    }
}

/// Response of `POST /ai/ask/{recordId}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskAnswer {
    /// The generated answer, if any.
    #[serde(default)]
    pub answer: Option<String>,
}

/// A user row from `GET /admin/users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    /// User identifier.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Email.
    #[serde(default)]
    pub email: Option<String>,
    /// Phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// Granted roles.
    #[serde(default)]
    pub roles: Vec<String>,
}

/// An audit trail entry from `GET /admin/audit-logs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    /// Entry identifier.
    pub id: String,
    /// Acting user.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Action performed (e.g. `delete_record`).
    pub action: String,
    /// Resource type touched.
    #[serde(default)]
    pub resource: Option<String>,
    /// Timestamp as sent by the server.
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// A patient row from `GET /patients/search`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientSummary {
    /// Patient identifier.
    pub id: String,
    /// Hospital medical id.
    #[serde(default)]
    pub medical_id: Option<String>,
    /// First name.
    #[serde(default)]
    pub first_name: String,
    /// Last name.
    #[serde(default)]
    pub last_name: String,
    /// Date of birth.
    #[serde(default)]
    pub date_of_birth: Option<String>,
    /// Gender.
    #[serde(default)]
    pub gender: Option<String>,
    /// Blood type.
    #[serde(default)]
    pub blood_type: Option<String>,
}

impl PatientSummary {
    /// Returns "First Last".
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}
