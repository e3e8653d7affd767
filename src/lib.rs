//! Virtual Try-On Generation Service
//!
//! This library provides the core functionality for the tryon-svc system:
//! submitting asynchronous try-on jobs to the FASHN image-generation API,
//! polling them to completion, normalizing the provider's heterogeneous
//! response shapes, and falling back to demo mode when generation cannot
//! proceed.

pub mod app_state;
pub mod config;
pub mod models;
pub mod routes;
pub mod services;
