pub mod checker;
pub mod lifecycle;
pub mod state;

pub use checker::*;
pub use lifecycle::*;
pub use state::*;
