//! Core library for network-constrained crime hotspot detection

pub mod config;
pub mod data;
pub mod density;
pub mod graph;
pub mod hotspot;
pub mod storage;

pub use anyhow::{Result, anyhow};
