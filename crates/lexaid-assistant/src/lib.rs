#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

//! lexaid-assistant
//!
//! The request pipeline: `decompose` turns a query (and optional attachment)
//! into labeled sub-queries, `orchestrator` runs each through its agent.

pub mod decompose;
pub mod orchestrator;

pub use decompose::{Decomposer, KeywordDecomposer};
pub use orchestrator::{Orchestrator, NO_VALID_QUERIES};
