//! HTTP handlers for master data endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{Client, JobRole, Neighborhood, Partner, StaffMember};
use crate::services::master_data::{
    CreateClientInput, CreateJobRoleInput, CreateNeighborhoodInput, CreatePartnerInput,
    CreateStaffInput, MasterDataService,
};
use crate::AppState;

// ============================================================================
// Clients
// ============================================================================

pub async fn create_client(
    State(state): State<AppState>,
    Json(input): Json<CreateClientInput>,
) -> AppResult<(StatusCode, Json<Client>)> {
    let service = MasterDataService::new(state.db);
    let client = service.create_client(input).await?;
    Ok((StatusCode::CREATED, Json(client)))
}

pub async fn list_clients(State(state): State<AppState>) -> AppResult<Json<Vec<Client>>> {
    let service = MasterDataService::new(state.db);
    let clients = service.list_clients().await?;
    Ok(Json(clients))
}

pub async fn get_client(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
) -> AppResult<Json<Client>> {
    let service = MasterDataService::new(state.db);
    let client = service.get_client(client_id).await?;
    Ok(Json(client))
}

// ============================================================================
// Staff members
// ============================================================================

pub async fn create_staff_member(
    State(state): State<AppState>,
    Json(input): Json<CreateStaffInput>,
) -> AppResult<(StatusCode, Json<StaffMember>)> {
    let service = MasterDataService::new(state.db);
    let staff = service.create_staff_member(input).await?;
    Ok((StatusCode::CREATED, Json(staff)))
}

pub async fn list_staff_members(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<StaffMember>>> {
    let service = MasterDataService::new(state.db);
    let staff = service.list_staff_members().await?;
    Ok(Json(staff))
}

pub async fn get_staff_member(
    State(state): State<AppState>,
    Path(staff_id): Path<Uuid>,
) -> AppResult<Json<StaffMember>> {
    let service = MasterDataService::new(state.db);
    let staff = service.get_staff_member(staff_id).await?;
    Ok(Json(staff))
}

// ============================================================================
// Partners
// ============================================================================

pub async fn create_partner(
    State(state): State<AppState>,
    Json(input): Json<CreatePartnerInput>,
) -> AppResult<(StatusCode, Json<Partner>)> {
    let service = MasterDataService::new(state.db);
    let partner = service.create_partner(input).await?;
    Ok((StatusCode::CREATED, Json(partner)))
}

pub async fn list_partners(State(state): State<AppState>) -> AppResult<Json<Vec<Partner>>> {
    let service = MasterDataService::new(state.db);
    let partners = service.list_partners().await?;
    Ok(Json(partners))
}

pub async fn get_partner(
    State(state): State<AppState>,
    Path(partner_id): Path<Uuid>,
) -> AppResult<Json<Partner>> {
    let service = MasterDataService::new(state.db);
    let partner = service.get_partner(partner_id).await?;
    Ok(Json(partner))
}

// ============================================================================
// Job roles and neighborhoods
// ============================================================================

pub async fn create_job_role(
    State(state): State<AppState>,
    Json(input): Json<CreateJobRoleInput>,
) -> AppResult<(StatusCode, Json<JobRole>)> {
    let service = MasterDataService::new(state.db);
    let role = service.create_job_role(input).await?;
    Ok((StatusCode::CREATED, Json(role)))
}

pub async fn list_job_roles(State(state): State<AppState>) -> AppResult<Json<Vec<JobRole>>> {
    let service = MasterDataService::new(state.db);
    let roles = service.list_job_roles().await?;
    Ok(Json(roles))
}

pub async fn create_neighborhood(
    State(state): State<AppState>,
    Json(input): Json<CreateNeighborhoodInput>,
) -> AppResult<(StatusCode, Json<Neighborhood>)> {
    let service = MasterDataService::new(state.db);
    let neighborhood = service.create_neighborhood(input).await?;
    Ok((StatusCode::CREATED, Json(neighborhood)))
}

pub async fn list_neighborhoods(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Neighborhood>>> {
    let service = MasterDataService::new(state.db);
    let neighborhoods = service.list_neighborhoods().await?;
    Ok(Json(neighborhoods))
}
