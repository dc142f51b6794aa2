//! Core data layer for a school-management front end: a collection-blob
//! record store, typed entity repositories, the student↔teacher assignment
//! synchronizer, attendance aggregation, and first-run seeding/migration.

pub mod attendance;
pub mod dashboard;
pub mod db;
pub mod error;
pub mod export;
pub mod ipc;
pub mod model;
pub mod notices;
pub mod payments;
pub mod progress;
pub mod seed;
pub mod store;
pub mod students;
pub mod sync;
pub mod teachers;

pub use db::SchoolDb;
pub use error::{DbError, Result};
