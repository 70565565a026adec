pub mod assembler;
pub mod navigator;
pub mod sampler;
pub mod sessions;

pub use assembler::Recommender;
pub use navigator::{OutfitHistory, OutfitNavigator};
pub use sessions::SessionRegistry;
