//! Legalis: contract review, legal document generation, corruption
//! reporting and legal news behind a bearer-authenticated HTTP API.
//!
//! Uploaded contracts live in a filesystem object store and move through
//! pending → in_review → completed under the review workflow; SQLite holds
//! all records.

pub mod api;
pub mod config;
pub mod db;
pub mod documents;
pub mod intelligence;
pub mod models;
pub mod news;
pub mod pipeline;
pub mod storage;
pub mod workflow;
