pub mod health;
pub mod job;
pub mod skill;
pub mod validation;
