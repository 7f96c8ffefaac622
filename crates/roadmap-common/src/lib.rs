pub mod completion_key;
pub mod error;
pub mod filter;
pub mod model;
pub mod normalize;
pub mod redis;
