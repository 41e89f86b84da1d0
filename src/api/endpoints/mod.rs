pub mod contracts;
pub mod documents;
pub mod files;
pub mod health;
pub mod news;
pub mod reports;
