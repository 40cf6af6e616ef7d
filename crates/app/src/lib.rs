//! Till application services: cart persistence, ERP access and checkout.

pub mod config;
pub mod context;
pub mod domain;
pub mod erp;
pub mod observability;
pub mod storage;

#[cfg(test)]
mod test;
