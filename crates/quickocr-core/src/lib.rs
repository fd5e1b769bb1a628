pub mod pipeline;
pub mod state;

pub use pipeline::{Pipeline, PipelineBusy};
pub use state::SessionState;
