//! Client (brand profile) services.

pub mod service;

pub use service::ClientService;
