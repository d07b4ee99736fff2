// Adapters layer: readers for exported decklists and the topoff list.

pub mod decklist;
pub mod decklist_store;
pub mod topoff;
