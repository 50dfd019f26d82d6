//! Handlers for the inbound RPC surface (spec §6). Each function is a
//! thin axum handler: parse request, call into core logic or a store,
//! translate errors via `safe_error::translate`.

pub mod article;
pub mod auth;
pub mod chat;
pub mod feed;
pub mod health;
