//! Order placement and seller fulfillment

pub mod queue;
pub mod workflow;

pub use queue::{PendingQueue, QueueError};
pub use workflow::OrderWorkflow;
