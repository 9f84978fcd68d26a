// Library exports for the Great Escape bot
// This allows the replay tool and the integration tests to use the core engine

pub mod bot;
pub mod collision;
pub mod config;
pub mod debug_logger;
pub mod evaluator;
pub mod grid;
pub mod handler;
pub mod legality;
pub mod pathfinding;
pub mod replay;
pub mod simple_profiler;
pub mod types;
