//! Error handling for the Recicla Operations Platform
//!
//! Provides consistent error responses in English and Portuguese

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use shared::validation::RuleViolation;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Business rule rejections from the validation engine. No state was
    // mutated; the response explains the violated threshold.
    #[error("rule violation: {0}")]
    Rule(#[from] RuleViolation),

    // Lock acquisition gave up after the configured bound. Safe to retry.
    #[error("timed out waiting for exclusive access to {key}")]
    LockTimeout { key: String },

    // The materialized inventory row and the movement log disagree. Requires
    // reconciliation, not resubmission.
    #[error("stock invariant violated for material {material_id}")]
    StockInvariantViolation { material_id: Uuid },

    // Validation errors
    #[error("Validation error: {message}")]
    Validation {
        field: String,
        message: String,
        message_pt: String,
    },

    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    #[error("Conflict: {message}")]
    Conflict {
        resource: String,
        message: String,
        message_pt: String,
    },

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_pt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

fn detail(code: &str, message_en: impl Into<String>, message_pt: impl Into<String>) -> ErrorDetail {
    ErrorDetail {
        code: code.to_string(),
        message_en: message_en.into(),
        message_pt: message_pt.into(),
        field: None,
    }
}

/// Map a validation engine rejection to a status and bilingual detail.
fn rule_response(violation: &RuleViolation) -> (StatusCode, ErrorDetail) {
    match violation {
        RuleViolation::MaterialNotFound => (
            StatusCode::NOT_FOUND,
            detail(
                "MATERIAL_NOT_FOUND",
                "Material not found",
                "Material não encontrado",
            ),
        ),
        RuleViolation::StaffNotFound => (
            StatusCode::NOT_FOUND,
            detail(
                "STAFF_NOT_FOUND",
                "Staff member not found",
                "Funcionário não encontrado",
            ),
        ),
        RuleViolation::ClientNotFound => (
            StatusCode::NOT_FOUND,
            detail(
                "CLIENT_NOT_FOUND",
                "Client not found",
                "Cliente não encontrado",
            ),
        ),
        RuleViolation::PartnerNotFound => (
            StatusCode::NOT_FOUND,
            detail(
                "PARTNER_NOT_FOUND",
                "Partner company not found",
                "Empresa parceira não encontrada",
            ),
        ),
        RuleViolation::MovementNotFound => (
            StatusCode::NOT_FOUND,
            detail(
                "MOVEMENT_NOT_FOUND",
                "Movement not found",
                "Movimentação não encontrada",
            ),
        ),
        RuleViolation::InvalidQuantity => (
            StatusCode::BAD_REQUEST,
            detail(
                "INVALID_QUANTITY",
                "Weight and volume must be positive",
                "Peso e volume devem ser positivos",
            ),
        ),
        RuleViolation::MonthlyCapExceeded { current_total } => (
            StatusCode::BAD_REQUEST,
            detail(
                "MONTHLY_CAP_EXCEEDED",
                format!(
                    "Monthly receipt cap exceeded: staff member already at {} kg of 100 kg this month",
                    current_total
                ),
                format!(
                    "Limite mensal de recebimento excedido: o funcionário já recebeu {} kg de 100 kg neste mês",
                    current_total
                ),
            ),
        ),
        RuleViolation::DailyCapExceeded { current_total } => (
            StatusCode::BAD_REQUEST,
            detail(
                "DAILY_CAP_EXCEEDED",
                format!(
                    "Daily receipt cap exceeded: {} kg of 2000 kg already received today",
                    current_total
                ),
                format!(
                    "Limite diário de recebimento excedido: já foram recebidos {} kg de 2000 kg hoje",
                    current_total
                ),
            ),
        ),
        RuleViolation::DuplicateDailyShipment => (
            StatusCode::BAD_REQUEST,
            detail(
                "DUPLICATE_DAILY_SHIPMENT",
                "A shipment for this partner already exists today",
                "Já existe um envio para esta empresa parceira hoje",
            ),
        ),
        RuleViolation::DuplicateDailyOrder => (
            StatusCode::BAD_REQUEST,
            detail(
                "DUPLICATE_DAILY_ORDER",
                "A collection order for this client and staff member already exists today",
                "Já existe uma ordem de coleta para este cliente e funcionário hoje",
            ),
        ),
        RuleViolation::InsufficientBaseStock { available } => (
            StatusCode::BAD_REQUEST,
            detail(
                "INSUFFICIENT_BASE_STOCK",
                format!(
                    "Stock below the 100 kg operating floor: {} kg on hand",
                    available
                ),
                format!(
                    "Estoque abaixo do mínimo operacional de 100 kg: {} kg disponíveis",
                    available
                ),
            ),
        ),
        RuleViolation::InsufficientStock {
            resource,
            available,
        } => (
            StatusCode::BAD_REQUEST,
            detail(
                "INSUFFICIENT_STOCK",
                format!("Insufficient {} available: {}", resource, available),
                format!(
                    "Estoque insuficiente de {}: {} disponíveis",
                    match resource {
                        shared::types::StockResource::Weight => "peso",
                        shared::types::StockResource::Volume => "volume",
                    },
                    available
                ),
            ),
        ),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::Rule(violation) => rule_response(violation),
            AppError::LockTimeout { .. } => (
                StatusCode::SERVICE_UNAVAILABLE,
                detail(
                    "LOCK_TIMEOUT",
                    "Could not get exclusive access to the material in time; please retry",
                    "Não foi possível obter acesso exclusivo ao material; tente novamente",
                ),
            ),
            AppError::StockInvariantViolation { material_id } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                detail(
                    "STOCK_INVARIANT_VIOLATION",
                    format!(
                        "Inventory and movement log diverged for material {}",
                        material_id
                    ),
                    format!(
                        "Inconsistência de estoque detectada para o material {}",
                        material_id
                    ),
                ),
            ),
            AppError::Validation {
                field,
                message,
                message_pt,
            } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: message.clone(),
                    message_pt: message_pt.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::DuplicateEntry(field) => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    code: "DUPLICATE_ENTRY".to_string(),
                    message_en: format!("A record with this {} already exists", field),
                    message_pt: format!("Já existe um registro com este {}", field),
                    field: Some(field.clone()),
                },
            ),
            AppError::Conflict {
                resource,
                message,
                message_pt,
            } => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    code: "CONFLICT".to_string(),
                    message_en: message.clone(),
                    message_pt: message_pt.clone(),
                    field: Some(resource.clone()),
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message_en: format!("{} not found", resource),
                    message_pt: format!("{} não encontrado", resource),
                    field: None,
                },
            ),
            AppError::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                detail(
                    "DATABASE_ERROR",
                    "A database error occurred",
                    "Ocorreu um erro no banco de dados",
                ),
            ),
            AppError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                detail(
                    "CONFIGURATION_ERROR",
                    format!("Configuration error: {}", msg),
                    "Erro de configuração".to_string(),
                ),
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                detail(
                    "INTERNAL_ERROR",
                    msg.clone(),
                    "Erro interno do servidor".to_string(),
                ),
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                detail(
                    "INTERNAL_ERROR",
                    "An internal server error occurred",
                    "Erro interno do servidor".to_string(),
                ),
            ),
        };

        // Rule rejections are routine; a server-side failure is not. A stock
        // invariant violation means the row and the log diverged and must be
        // reconciled before the material is trusted again.
        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::warn!("Error: {:?}", self);
        }

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
