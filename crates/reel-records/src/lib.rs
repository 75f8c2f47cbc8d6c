//! Record store REST client.
//!
//! This crate provides:
//! - Loading a job record by id
//! - Typed partial updates (status, result locators)
//! - A [`JobStore`] trait so the worker is testable with an in-memory fake

pub mod client;
pub mod error;

pub use client::{JobStore, RecordsClient, RecordsConfig};
pub use error::{RecordsError, RecordsResult};
