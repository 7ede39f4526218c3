pub mod admin;
pub mod health;
pub mod tracking;
pub mod voyage;
