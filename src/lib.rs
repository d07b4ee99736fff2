pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::{cli::LocalStorage, toml_config::TomlConfig};

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use core::card_list::CardList;
pub use core::card_move::CardMove;
pub use core::planner::{Planner, PlannerSettings};
pub use core::{engine::DiffEngine, pipeline::DiffPipeline};
pub use utils::error::{DiffError, Result};
