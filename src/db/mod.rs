pub mod connection;
pub mod job_repository;
pub mod migrations;
pub mod models;
pub mod party_repository;
pub mod skill_repository;
