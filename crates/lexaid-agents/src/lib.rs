#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

//! Task agents: case discovery, legal aid and legal drafting.

pub mod case_discovery;
pub mod drafting;
pub mod legal_aid;
pub mod prompt;

pub use case_discovery::{CaseDiscoveryAgent, CaseDiscoveryOutput};
pub use drafting::LegalDraftingAgent;
pub use legal_aid::{LegalAidAgent, LegalAidOutput};

use lexaid_core::config::{expand_path, Settings};
use lexaid_vector::StoreConfig;

/// Store configuration for one retrieval agent, with `index` as its index path.
pub fn store_config(settings: &Settings, index: &str) -> StoreConfig {
    StoreConfig {
        index_path: expand_path(index),
        dimension: settings.retrieval.dimension,
        duplicate_policy: settings.retrieval.duplicate_policy,
    }
}
