//! AI components

pub mod controller;
pub mod fsm;


// Re-export all components
pub use controller::*;
pub use fsm::*;
