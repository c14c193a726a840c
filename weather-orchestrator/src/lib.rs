//! Orchestrator service: resolves a CEP to its city via ViaCEP, then the
//! city to its current temperature via WeatherAPI, and returns the unified
//! report. The binary lives in `main.rs`; this library surface exists so
//! integration tests can drive the router directly.

pub mod config;
pub mod handlers;
