use async_trait::async_trait;

use crate::errors::ActorProcessingError;
use crate::runtime::Context;
use crate::traits::{Identity, Message};

/// A unit of computation in the actor graph.
///
/// `identity` and `receive` are mandatory. Every lifecycle hook has a no-op
/// default, so an actor opts into exactly the hooks it overrides and the runtime
/// calls the rest as no-ops.
///
/// The runtime owns the actor exclusively once the graph is ready: `receive` and
/// the hooks take `&mut self`, so actor state needs no locking.
#[async_trait]
pub trait Actor<M: Message>: Identity + Send + 'static {
    /// Process one payload and return the value broadcast to every child.
    async fn receive(&mut self, ctx: &Context<M>, payload: M) -> Result<M, ActorProcessingError<M>>;

    /// Runs once before the first message is dequeued.
    async fn pre_start(&mut self, _ctx: &Context<M>) {}

    /// Runs once after the execution loop exits.
    async fn post_stop(&mut self, _ctx: &Context<M>) {}

    /// Runs with the raw input before `receive`.
    async fn pre_handle_msg(&mut self, _ctx: &Context<M>, _msg: &M) {}

    /// Runs with a successful result before it is broadcast.
    async fn post_handle_msg(&mut self, _ctx: &Context<M>, _result: &M) {}

    /// Runs when `receive` fails.
    async fn error_handler(&mut self, _ctx: &Context<M>, _error: &ActorProcessingError<M>) {}
}
