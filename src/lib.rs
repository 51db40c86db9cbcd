// src/lib.rs
//! Bow-tie decomposition of daily recommendation networks.
//!
//! Each snapshot lists, per target video, the videos recommending it and
//! the list position. Keeping positions below a cutoff gives a directed
//! graph whose nodes are split into the core (largest strongly connected
//! component), IN, OUT, TENDRILS and DISCONNECTED, with node and attention
//! shares per region.

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod events;
pub mod exit;
pub mod graph;
pub mod sweep;
