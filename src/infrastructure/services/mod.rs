//! Application services

mod key_resource_service;

pub use key_resource_service::KeyResourceService;
