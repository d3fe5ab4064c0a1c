//! Stockroom inventory domain, storage and caching.

pub mod cache;
pub mod config;
pub mod context;
pub mod database;
pub mod domain;
pub mod ids;

#[cfg(test)]
mod test;
