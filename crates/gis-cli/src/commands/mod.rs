pub mod analytics;
pub mod audit;
pub mod budget;
pub mod cluster;
pub mod compat;
pub mod dispatch;
pub mod init;
pub mod project;
pub mod seed;
pub mod shared;
pub mod suitability;
pub mod zone;
