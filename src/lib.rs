pub mod codes;
pub mod config;
pub mod crypto;
pub mod db;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod kv;
pub mod middleware;
pub mod models;
pub mod receipts;
pub mod registry;
pub mod util;
