//! Specialized containers used by the graph substrate and solver engines.

mod priority_queue;
mod svector;
mod zvector;

pub use priority_queue::PriorityQueueRp;
pub use svector::SVector;
pub use zvector::ZVector;
