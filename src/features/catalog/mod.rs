pub mod dtos;
pub mod form;
pub mod handlers;
pub mod models;
pub mod projection;
pub mod routes;
pub mod services;
pub mod store;

pub use services::CatalogService;
