//! DXB: Dubai Land Department transaction toolkit
//!
//! Read-only queries, rollups and flip-history reconstruction over a local
//! SQLite copy of DLD property transactions.

pub mod cli;
pub mod core;
