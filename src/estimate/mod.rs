mod fsm;
mod pipeline;
mod prompt;
mod upload;

pub use fsm::*;
pub use pipeline::*;
pub use prompt::*;
pub use upload::*;
