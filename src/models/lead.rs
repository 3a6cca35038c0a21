//! Lead model: investor inquiries captured by the profit-simulation form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::models::villa::validate_wa_number;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq)]
#[sqlx(type_name = "lead_status")]
pub enum LeadStatus {
    Baru,
    Dihubungi,
    Tertarik,
    #[sqlx(rename = "Tidak Tertarik")]
    #[serde(rename = "Tidak Tertarik")]
    TidakTertarik,
}

/// Full lead row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Lead {
    pub id: Uuid,
    pub nama: String,
    pub domisili: String,
    pub no_wa: String,
    pub status: LeadStatus,
    pub villa_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Lead row joined with the villa it was submitted for.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct LeadWithVilla {
    pub id: Uuid,
    pub nama: String,
    pub domisili: String,
    pub no_wa: String,
    pub status: LeadStatus,
    pub villa_id: Option<Uuid>,
    pub villa_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Public submission payload from the marketing site.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLead {
    #[validate(length(min = 1, message = "nama is required"))]
    pub nama: String,
    #[validate(length(min = 1, message = "domisili is required"))]
    pub domisili: String,
    #[validate(custom(function = validate_wa_number))]
    pub no_wa: String,
    pub villa_id: Option<Uuid>,
}

/// Admin status change payload.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateLeadStatus {
    pub status: LeadStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lead_status_serde_matches_wire_value() {
        assert_eq!(
            serde_json::to_string(&LeadStatus::TidakTertarik).unwrap(),
            "\"Tidak Tertarik\""
        );
        let back: LeadStatus = serde_json::from_str("\"Baru\"").unwrap();
        assert_eq!(back, LeadStatus::Baru);
    }

    #[test]
    fn create_lead_requires_valid_wa_number() {
        let lead = CreateLead {
            nama: "Budi".to_string(),
            domisili: "Jakarta".to_string(),
            no_wa: "6281234567890".to_string(),
            villa_id: None,
        };
        assert!(lead.validate().is_ok());

        let mut bad = lead.clone();
        bad.no_wa = "0812345".to_string();
        assert!(bad.validate().is_err());

        let mut bad = lead;
        bad.nama = String::new();
        assert!(bad.validate().is_err());
    }
}
