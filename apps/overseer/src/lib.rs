//! Overseer Library
//!
//! A manager agent decomposes a human's goal into tasks, delegates them to
//! worker agents and reports back once the goal is met. Both roles think
//! through a language model completion service.

pub mod agents;
pub mod config;
pub mod infrastructure;
