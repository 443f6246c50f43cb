// handlers/public/mod.rs - Public handlers (no authentication required)
//
// The menu listing and service endpoints. No token is read here.

pub mod drinks;
pub mod service;
