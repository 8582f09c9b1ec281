//! Faculty portal submission review workflow.
//!
//! Faculty members submit records of their academic output; cluster heads
//! and deans review the submissions within their department or school.
//! The [`workflow`] module holds the domain rules, [`repository`] the
//! storage seam, and [`routes`] the HTTP surface.

pub mod config;
pub mod db;
pub mod repository;
pub mod routes;
pub mod state;
pub mod templates;
pub mod workflow;
