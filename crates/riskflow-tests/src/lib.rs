//! Shared fixtures for the Riskflow integration suite.

pub mod helpers;
