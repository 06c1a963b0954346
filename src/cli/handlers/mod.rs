// src/cli/handlers/mod.rs

// One module per CLI action. Every handler parses its own arguments.

pub mod catalog;
pub mod commons;
pub mod pick;
pub mod reset;
pub mod search;
pub mod select;
pub mod show;
pub mod status;
pub mod ticket;
pub mod toggles;
pub mod tree;
