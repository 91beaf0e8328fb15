#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

//! Shared types, traits, errors and configuration for the LexAid workspace.

pub mod config;
pub mod corpus;
pub mod error;
pub mod traits;
pub mod types;
