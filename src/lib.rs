//! Azul rule engine and self-play tooling
//!
//! Re-exports the `azul-engine` crate and adds agents, a game driver and a
//! text renderer on top of its public command contract.

pub use azul_engine::*;

pub mod agent;
pub mod display;
