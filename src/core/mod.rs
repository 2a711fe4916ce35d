pub mod catalog;
pub mod db;
pub mod error;
pub mod indicators;
pub mod input;
pub mod loader;
pub mod record;
pub mod schemas;
