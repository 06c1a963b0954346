//! # System Interaction Layer
//!
//! Reads what the host tells us about itself, kept apart from the engine so
//! the engine stays free of environment lookups.
//!
//! ## Modules
//!
//! - **`appearance`**: derives a light/dark theme from the terminal when the
//!   user has not chosen one.

pub mod appearance;
