//! Business logic services for the Recicla Operations Platform

pub mod collection_order;
pub mod master_data;
pub mod material;
pub mod receipt;
pub mod shipment;

pub use collection_order::CollectionOrderService;
pub use master_data::MasterDataService;
pub use material::MaterialService;
pub use receipt::ReceiptService;
pub use shipment::ShipmentService;
