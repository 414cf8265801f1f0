//! Unit tests for the stevedore CLI
//!
//! These tests use mocked dependencies and run fast without external I/O.

mod architecture;
mod classifier_properties;
mod compose_service;
mod transfer_service;
mod update_service;
