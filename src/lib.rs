pub mod api;
pub mod config;
pub mod error;
pub mod form;
pub mod provider;
pub mod storage;
