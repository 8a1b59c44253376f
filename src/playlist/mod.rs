pub mod collector;
pub mod config;
pub mod dedupe;
pub mod generator;
pub mod metadata;
pub mod normalize;
pub mod resolver;
pub mod shuffle;
pub mod utils;


pub use config::*;
pub use generator::*;
pub use metadata::*;
