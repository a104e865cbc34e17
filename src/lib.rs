//! Trazo - delivery route lookup and optimizer reconciliation
//!
//! Fetches the candidate delivery routes for a product and postal code from
//! the warehouse, asks the route optimizer which of them to use, and merges
//! the two into one annotated view where every candidate is kept and the
//! optimizer's picks are marked.

pub mod candidate;
pub mod cli;
pub mod config;
pub mod logging;
pub mod optimizer;
pub mod reconcile;
pub mod session;
pub mod warehouse;
