pub mod action;
pub mod application;
pub mod asset;
pub mod commands;
pub mod download;
pub mod error;
pub mod http;
pub mod platform;
pub mod provider;
pub mod runtime;
pub mod version;
