use std::fmt::Debug;

/// Payload type that can flow through the actor graph.
///
/// Blanket-implemented: any cloneable, thread-safe type qualifies. Hosts that need
/// several payload shapes in one graph use an enum.
pub trait Message: Clone + Debug + Send + Sync + 'static {}

impl<T> Message for T where T: Clone + Debug + Send + Sync + 'static {}
