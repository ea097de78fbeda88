//! Fleet status engine: normalize, classify, detect transitions, announce.

pub mod classifier;
pub mod clock;
pub mod dispatch;
pub mod engine;
pub mod model;
pub mod normalizer;
pub mod source;
pub mod transition;
