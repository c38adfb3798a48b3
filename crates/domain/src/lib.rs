//! Domain layer for the water-refill delivery backend.
//!
//! This crate contains:
//! - Domain models (Device, Order, DistanceThreshold)
//! - The pure proximity evaluation logic
//! - The chat notification service trait

pub mod models;
pub mod services;
