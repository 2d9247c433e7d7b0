// Library for tests to access modules

pub mod config;
pub mod dashboard;
pub mod format;
pub mod models;
pub mod provider;
pub mod routes;
pub mod sampler;
pub mod sysinfo_repo;
