// src/lib.rs

//! COVID dashboard crawler library.
//!
//! Scrapes the dashboard page into a [`models::DashboardSnapshot`] and writes
//! it into a star-schema warehouse through [`storage::Warehouse`].

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
