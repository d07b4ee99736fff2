pub mod card_list;
pub mod card_move;
pub mod engine;
pub mod pipeline;
pub mod planner;

pub use crate::domain::model::{Plan, PlanInput};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
