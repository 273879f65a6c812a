pub mod model;
pub mod queue;
pub mod relocator;
pub mod selector;

pub use model::{ClaimedItem, DescriptorError, JobDescriptor, Prefix};
pub use queue::WorkQueue;
pub use relocator::{RelocationError, relocate};
pub use selector::select_candidates;
