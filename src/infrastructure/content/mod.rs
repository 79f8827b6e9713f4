//! Content adapters for the faction-data port

mod json_faction_store;

pub use json_faction_store::JsonFactionStore;
