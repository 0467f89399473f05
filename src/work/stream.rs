use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::stream::Stream;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::error::Result;
use crate::work::task::TaskResult;
use crate::work::worker::WorkerPool;

/// Results of one batch, yielded in completion order.
///
/// The stream ends once every task of the batch has reported, and cannot be
/// restarted. Dropping it early lets running tasks finish but discards the
/// tasks that have not started yet.
#[derive(Debug)]
pub struct ResultStream<O> {
    receiver: UnboundedReceiver<TaskResult<O>>,
    remaining: usize,
    pool: WorkerPool,
}

impl<O> ResultStream<O> {
    pub(crate) fn new(
        receiver: UnboundedReceiver<TaskResult<O>>,
        total: usize,
        pool: WorkerPool,
    ) -> Self {
        Self {
            receiver,
            remaining: total,
            pool,
        }
    }

    /// Number of results not yet delivered.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Waits for the next task to finish.
    pub async fn next_result(&mut self) -> Option<TaskResult<O>> {
        let result = self.receiver.recv().await;
        if result.is_some() {
            self.remaining = self.remaining.saturating_sub(1);
        }
        result
    }

    /// Collects every remaining result, then joins the workers.
    pub async fn drain(mut self) -> Result<Vec<TaskResult<O>>> {
        let mut results = Vec::with_capacity(self.remaining);
        while let Some(result) = self.next_result().await {
            results.push(result);
        }
        self.pool.join().await?;
        Ok(results)
    }
}

impl<O> Stream for ResultStream<O> {
    type Item = TaskResult<O>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        let polled = this.receiver.poll_recv(cx);
        if let Poll::Ready(Some(_)) = &polled {
            this.remaining = this.remaining.saturating_sub(1);
        }
        polled
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}
