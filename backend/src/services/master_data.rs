//! Master data service: clients, staff, partners, job roles, neighborhoods
//!
//! Plain record management for the people and companies the ledger
//! references. The only rules here are uniqueness and existence of
//! referenced records; document formats are accepted as given.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use shared::models::{Client, JobRole, Neighborhood, Partner, StaffMember};

use crate::error::{AppError, AppResult};

/// Master data service for the records the ledger references
#[derive(Clone)]
pub struct MasterDataService {
    db: PgPool,
}

/// Input for registering a client
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateClientInput {
    pub name: String,
    pub cpf: String,
    pub neighborhood_id: Option<Uuid>,
}

/// Input for registering a staff member
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStaffInput {
    pub name: String,
    pub cpf: String,
    pub job_role_id: Option<Uuid>,
}

/// Input for registering a partner company
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePartnerInput {
    pub company_name: String,
    pub cnpj: String,
}

/// Input for creating a job role
#[derive(Debug, Deserialize)]
pub struct CreateJobRoleInput {
    pub title: String,
}

/// Input for creating a neighborhood
#[derive(Debug, Deserialize)]
pub struct CreateNeighborhoodInput {
    pub name: String,
}

type ClientRow = (Uuid, String, String, Option<Uuid>, DateTime<Utc>);
type StaffRow = (Uuid, String, String, Option<Uuid>, DateTime<Utc>);
type PartnerRow = (Uuid, String, String, DateTime<Utc>);
type NamedRow = (Uuid, String, DateTime<Utc>);

fn client_from(row: ClientRow) -> Client {
    Client {
        id: row.0,
        name: row.1,
        cpf: row.2,
        neighborhood_id: row.3,
        created_at: row.4,
    }
}

fn staff_from(row: StaffRow) -> StaffMember {
    StaffMember {
        id: row.0,
        name: row.1,
        cpf: row.2,
        job_role_id: row.3,
        created_at: row.4,
    }
}

fn partner_from(row: PartnerRow) -> Partner {
    Partner {
        id: row.0,
        company_name: row.1,
        cnpj: row.2,
        created_at: row.3,
    }
}

impl MasterDataService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    // ========================================================================
    // Clients
    // ========================================================================

    pub async fn create_client(&self, input: CreateClientInput) -> AppResult<Client> {
        if let Some(neighborhood_id) = input.neighborhood_id {
            let exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM neighborhoods WHERE id = $1)",
            )
            .bind(neighborhood_id)
            .fetch_one(&self.db)
            .await?;
            if !exists {
                return Err(AppError::NotFound("Neighborhood".to_string()));
            }
        }

        let taken =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM clients WHERE cpf = $1)")
                .bind(&input.cpf)
                .fetch_one(&self.db)
                .await?;
        if taken {
            return Err(AppError::DuplicateEntry("cpf".to_string()));
        }

        let row = sqlx::query_as::<_, ClientRow>(
            r#"
            INSERT INTO clients (name, cpf, neighborhood_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, cpf, neighborhood_id, created_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.cpf)
        .bind(input.neighborhood_id)
        .fetch_one(&self.db)
        .await?;

        Ok(client_from(row))
    }

    pub async fn list_clients(&self) -> AppResult<Vec<Client>> {
        let rows = sqlx::query_as::<_, ClientRow>(
            "SELECT id, name, cpf, neighborhood_id, created_at FROM clients ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(client_from).collect())
    }

    pub async fn get_client(&self, client_id: Uuid) -> AppResult<Client> {
        let row = sqlx::query_as::<_, ClientRow>(
            "SELECT id, name, cpf, neighborhood_id, created_at FROM clients WHERE id = $1",
        )
        .bind(client_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Client".to_string()))?;

        Ok(client_from(row))
    }

    // ========================================================================
    // Staff members
    // ========================================================================

    pub async fn create_staff_member(&self, input: CreateStaffInput) -> AppResult<StaffMember> {
        if let Some(job_role_id) = input.job_role_id {
            let exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM job_roles WHERE id = $1)",
            )
            .bind(job_role_id)
            .fetch_one(&self.db)
            .await?;
            if !exists {
                return Err(AppError::NotFound("Job role".to_string()));
            }
        }

        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM staff_members WHERE cpf = $1)",
        )
        .bind(&input.cpf)
        .fetch_one(&self.db)
        .await?;
        if taken {
            return Err(AppError::DuplicateEntry("cpf".to_string()));
        }

        let row = sqlx::query_as::<_, StaffRow>(
            r#"
            INSERT INTO staff_members (name, cpf, job_role_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, cpf, job_role_id, created_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.cpf)
        .bind(input.job_role_id)
        .fetch_one(&self.db)
        .await?;

        Ok(staff_from(row))
    }

    pub async fn list_staff_members(&self) -> AppResult<Vec<StaffMember>> {
        let rows = sqlx::query_as::<_, StaffRow>(
            "SELECT id, name, cpf, job_role_id, created_at FROM staff_members ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(staff_from).collect())
    }

    pub async fn get_staff_member(&self, staff_id: Uuid) -> AppResult<StaffMember> {
        let row = sqlx::query_as::<_, StaffRow>(
            "SELECT id, name, cpf, job_role_id, created_at FROM staff_members WHERE id = $1",
        )
        .bind(staff_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Staff member".to_string()))?;

        Ok(staff_from(row))
    }

    // ========================================================================
    // Partners
    // ========================================================================

    pub async fn create_partner(&self, input: CreatePartnerInput) -> AppResult<Partner> {
        let taken =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM partners WHERE cnpj = $1)")
                .bind(&input.cnpj)
                .fetch_one(&self.db)
                .await?;
        if taken {
            return Err(AppError::DuplicateEntry("cnpj".to_string()));
        }

        let row = sqlx::query_as::<_, PartnerRow>(
            r#"
            INSERT INTO partners (company_name, cnpj)
            VALUES ($1, $2)
            RETURNING id, company_name, cnpj, created_at
            "#,
        )
        .bind(&input.company_name)
        .bind(&input.cnpj)
        .fetch_one(&self.db)
        .await?;

        Ok(partner_from(row))
    }

    pub async fn list_partners(&self) -> AppResult<Vec<Partner>> {
        let rows = sqlx::query_as::<_, PartnerRow>(
            "SELECT id, company_name, cnpj, created_at FROM partners ORDER BY company_name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(partner_from).collect())
    }

    pub async fn get_partner(&self, partner_id: Uuid) -> AppResult<Partner> {
        let row = sqlx::query_as::<_, PartnerRow>(
            "SELECT id, company_name, cnpj, created_at FROM partners WHERE id = $1",
        )
        .bind(partner_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Partner".to_string()))?;

        Ok(partner_from(row))
    }

    // ========================================================================
    // Job roles and neighborhoods
    // ========================================================================

    pub async fn create_job_role(&self, input: CreateJobRoleInput) -> AppResult<JobRole> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM job_roles WHERE title = $1)",
        )
        .bind(&input.title)
        .fetch_one(&self.db)
        .await?;
        if taken {
            return Err(AppError::DuplicateEntry("title".to_string()));
        }

        let row = sqlx::query_as::<_, NamedRow>(
            "INSERT INTO job_roles (title) VALUES ($1) RETURNING id, title, created_at",
        )
        .bind(&input.title)
        .fetch_one(&self.db)
        .await?;

        Ok(JobRole {
            id: row.0,
            title: row.1,
            created_at: row.2,
        })
    }

    pub async fn list_job_roles(&self) -> AppResult<Vec<JobRole>> {
        let rows = sqlx::query_as::<_, NamedRow>(
            "SELECT id, title, created_at FROM job_roles ORDER BY title",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| JobRole {
                id: row.0,
                title: row.1,
                created_at: row.2,
            })
            .collect())
    }

    pub async fn create_neighborhood(
        &self,
        input: CreateNeighborhoodInput,
    ) -> AppResult<Neighborhood> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM neighborhoods WHERE name = $1)",
        )
        .bind(&input.name)
        .fetch_one(&self.db)
        .await?;
        if taken {
            return Err(AppError::DuplicateEntry("name".to_string()));
        }

        let row = sqlx::query_as::<_, NamedRow>(
            "INSERT INTO neighborhoods (name) VALUES ($1) RETURNING id, name, created_at",
        )
        .bind(&input.name)
        .fetch_one(&self.db)
        .await?;

        Ok(Neighborhood {
            id: row.0,
            name: row.1,
            created_at: row.2,
        })
    }

    pub async fn list_neighborhoods(&self) -> AppResult<Vec<Neighborhood>> {
        let rows = sqlx::query_as::<_, NamedRow>(
            "SELECT id, name, created_at FROM neighborhoods ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| Neighborhood {
                id: row.0,
                name: row.1,
                created_at: row.2,
            })
            .collect())
    }
}

// ============================================================================
// Lookups used by the ledger pipelines
// ============================================================================

/// Resolve a staff member id by CPF inside a ledger transaction.
pub(crate) async fn find_staff_id_by_cpf(
    conn: &mut PgConnection,
    cpf: &str,
) -> Result<Option<Uuid>, AppError> {
    let id = sqlx::query_scalar::<_, Uuid>("SELECT id FROM staff_members WHERE cpf = $1")
        .bind(cpf)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(id)
}

/// Resolve a client id by CPF inside a ledger transaction.
pub(crate) async fn find_client_id_by_cpf(
    conn: &mut PgConnection,
    cpf: &str,
) -> Result<Option<Uuid>, AppError> {
    let id = sqlx::query_scalar::<_, Uuid>("SELECT id FROM clients WHERE cpf = $1")
        .bind(cpf)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(id)
}

/// Resolve a partner id by CNPJ inside a ledger transaction.
pub(crate) async fn find_partner_id_by_cnpj(
    conn: &mut PgConnection,
    cnpj: &str,
) -> Result<Option<Uuid>, AppError> {
    let id = sqlx::query_scalar::<_, Uuid>("SELECT id FROM partners WHERE cnpj = $1")
        .bind(cnpj)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(id)
}
