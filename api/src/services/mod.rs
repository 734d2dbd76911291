// Business logic service implementations

pub mod contract_service;
pub mod farcaster_service;
pub mod health;
pub mod ipfs_service;
pub mod profile_service;
pub mod support_service;
pub mod validation;
