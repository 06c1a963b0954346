// src/core/mod.rs

pub mod catalog;
pub mod paths;
pub mod resolver;
pub mod search;
pub mod session;
pub mod settings;
pub mod store;
pub mod ticket;
