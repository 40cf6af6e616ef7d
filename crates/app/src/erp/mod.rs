//! ERP access over Odoo's JSON-RPC interface

mod client;
mod errors;
pub mod models;
mod rpc;
mod service;

pub use client::{OdooClient, OdooConfig};
pub use errors::ErpError;
pub use service::*;
