//! Clinic dashboard client: pulls doctors, clinics, rosters, on-call duty and
//! notifications from one JSON endpoint and renders summaries into named
//! render targets.

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod models;
pub mod notify;
pub mod page;
pub mod render;
pub mod tui;
