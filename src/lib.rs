// Library for tests to access modules

pub mod config;
pub mod export;
pub mod generator;
pub mod models;
pub mod routes;
pub mod settings_repo;
pub mod store;
pub mod version;
pub mod worker;
