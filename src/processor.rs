use async_trait::async_trait;

use crate::record::{Outcome, Record, Routed};

/// Processor trait for implementing a record handler.
#[async_trait]
pub trait Processor: Send + Sync {
    /// `process` takes one record and hands it back together with exactly one [`Outcome`].
    /// Errors are never returned to the caller: a record that can't be processed is routed to
    /// [`Outcome::Failure`].
    ///
    /// Must be awaited inside a tokio runtime: implementations such as
    /// [`LookupGateway`](crate::gateway::LookupGateway) spawn tasks while processing.
    ///
    /// # Example
    ///
    /// A processor that passes every record through untouched.
    ///
    /// ```
    /// use flowsample::processor::Processor;
    /// use flowsample::record::{Record, Routed};
    ///
    /// struct Passthrough;
    ///
    /// #[async_trait::async_trait]
    /// impl Processor for Passthrough {
    ///     async fn process(&self, record: Record) -> Routed {
    ///         Routed::success(record)
    ///     }
    /// }
    /// ```
    async fn process(&self, record: Record) -> Routed;

    /// Outcomes this processor may route to.
    fn relationships(&self) -> &'static [Outcome] {
        &Outcome::ALL
    }
}
