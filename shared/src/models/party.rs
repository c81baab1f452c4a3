//! Master data: the people and companies the ledger references
//!
//! Plain record management. The only rules these carry are uniqueness of
//! their documents/names and existence when a movement references them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A client the operation collects material from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub cpf: String,
    pub neighborhood_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// A collection staff member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: Uuid,
    pub name: String,
    pub cpf: String,
    pub job_role_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// A partner processing company that receives shipments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Partner {
    pub id: Uuid,
    pub company_name: String,
    pub cnpj: String,
    pub created_at: DateTime<Utc>,
}

/// A staff job role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRole {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

/// A neighborhood served by the operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Neighborhood {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
