// Public API - what other modules can use
pub use handlers::{create_player, get_player, index, list_players, rename_player};
pub use registry::PlayerRegistry;

// Internal modules
pub mod errors;
mod handlers;
pub mod models;
pub mod registry;
pub mod repository;
pub mod types;
