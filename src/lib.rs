pub mod api;
pub mod client;
pub mod config;
pub mod data_models;
pub mod error;
pub mod mock;
pub mod query;
pub mod render;
pub mod screen;
pub mod suggest;
