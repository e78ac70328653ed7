pub mod author;
pub mod match_kind;
pub mod paper;

pub use author::*;
pub use match_kind::*;
pub use paper::*;
