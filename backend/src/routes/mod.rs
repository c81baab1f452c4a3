//! Route definitions for the Recicla Operations Platform

use axum::{routing::get, Router};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Stock ledger
        .nest("/materials", material_routes())
        .nest("/receipts", receipt_routes())
        .nest("/shipments", shipment_routes())
        .nest("/collection-orders", collection_order_routes())
        // Master data
        .nest("/clients", client_routes())
        .nest("/staff", staff_routes())
        .nest("/partners", partner_routes())
        .nest("/job-roles", job_role_routes())
        .nest("/neighborhoods", neighborhood_routes())
}

/// Material inventory routes
fn material_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_materials).post(handlers::create_material),
        )
        .route("/summary", get(handlers::material_summary))
        .route(
            "/:material_id",
            get(handlers::get_material).delete(handlers::delete_material),
        )
        .route(
            "/:material_id/reconciliation",
            get(handlers::material_reconciliation),
        )
}

/// Receipt routes
fn receipt_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_receipts).post(handlers::create_receipt),
        )
        .route("/:receipt_id", get(handlers::get_receipt))
}

/// Shipment routes
fn shipment_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_shipments).post(handlers::create_shipment),
        )
        .route(
            "/:shipment_id",
            get(handlers::get_shipment).delete(handlers::retract_shipment),
        )
}

/// Collection order routes
fn collection_order_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_collection_orders).post(handlers::create_collection_order),
        )
        .route("/:order_id", get(handlers::get_collection_order))
}

/// Client routes
fn client_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_clients).post(handlers::create_client))
        .route("/:client_id", get(handlers::get_client))
}

/// Staff member routes
fn staff_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_staff_members).post(handlers::create_staff_member),
        )
        .route("/:staff_id", get(handlers::get_staff_member))
}

/// Partner company routes
fn partner_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_partners).post(handlers::create_partner),
        )
        .route("/:partner_id", get(handlers::get_partner))
}

/// Job role routes
fn job_role_routes() -> Router<AppState> {
    Router::new().route(
        "/",
        get(handlers::list_job_roles).post(handlers::create_job_role),
    )
}

/// Neighborhood routes
fn neighborhood_routes() -> Router<AppState> {
    Router::new().route(
        "/",
        get(handlers::list_neighborhoods).post(handlers::create_neighborhood),
    )
}
