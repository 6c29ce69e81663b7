//! Infrastructure layer - Gateway access, logging and services

pub mod gateway;
pub mod logging;
pub mod services;
