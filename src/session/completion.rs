//! Completion futures and error hooks for the async API.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::channel::oneshot;

use crate::error::{SchematicError, SchematicResult};

/// Error callback invoked on the simulation thread before a completion
/// future is failed. The same hook carries deferred auto-removal failures,
/// which fire after the paste future has already resolved.
pub type ErrorHook = Arc<dyn Fn(&SchematicError) + Send + Sync>;

/// Future side of an async paste or undo.
///
/// Completes on the simulation thread once the world mutation step has
/// finished, never after the decode step alone. Cannot be cancelled; dropping
/// it only makes the outcome unobservable.
pub struct Completion {
    rx: oneshot::Receiver<SchematicResult<()>>,
}

impl Completion {
    /// Block the calling thread until the operation finishes.
    pub fn wait(self) -> SchematicResult<()> {
        futures::executor::block_on(self)
    }
}

impl Future for Completion {
    type Output = SchematicResult<()>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(oneshot::Canceled)) => Poll::Ready(Err(SchematicError::ChannelClosed {
                name: "completion".to_string(),
            })),
            Poll::Pending => Poll::Pending,
        }
    }
}

pub(crate) struct CompletionSender {
    tx: oneshot::Sender<SchematicResult<()>>,
}

impl CompletionSender {
    /// Resolve the paired future. The receiver may already be gone, in which
    /// case the outcome is simply unobserved.
    pub(crate) fn complete(self, result: SchematicResult<()>) {
        let _ = self.tx.send(result);
    }
}

pub(crate) fn channel() -> (CompletionSender, Completion) {
    let (tx, rx) = oneshot::channel();
    (CompletionSender { tx }, Completion { rx })
}
