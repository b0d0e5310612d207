use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::sync::Notify;

use crate::Status;

/// State shared by both halves of a stream pair.
struct Shared {
    cancelled: AtomicBool,
    notify: Notify,
}

impl Shared {
    fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
        self.notify.notify_waiters();
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// The sending half of a FIFO message stream.
///
/// Messages are delivered to the paired [`RecvStream`] in send order.
/// `send` suspends while the receiver applies backpressure. After either
/// half cancels the pair, every subsequent operation completes with
/// `Status::cancelled`.
pub struct SendStream<T> {
    tx: mpsc::Sender<T>,
    shared: Arc<Shared>,
}

/// The receiving half of a FIFO message stream.
pub struct RecvStream<T> {
    rx: mpsc::Receiver<T>,
    shared: Arc<Shared>,
}

/// Creates a connected stream pair with the given backpressure capacity.
///
/// Transports use this to wire each direction of a call; the two
/// directions of a bidirectional call are two independent pairs.
pub fn stream_pair<T>(capacity: usize) -> (SendStream<T>, RecvStream<T>) {
    let (tx, rx) = mpsc::channel(capacity);
    let shared = Arc::new(Shared {
        cancelled: AtomicBool::new(false),
        notify: Notify::new(),
    });
    (
        SendStream {
            tx,
            shared: Arc::clone(&shared),
        },
        RecvStream { rx, shared },
    )
}

impl<T> SendStream<T> {
    /// Sends a message to the peer, suspending while the stream is at
    /// capacity.
    ///
    /// Fails with `Status::cancelled` once the pair is cancelled or the
    /// receiving half has been dropped.
    pub async fn send(&self, message: T) -> Result<(), Status> {
        let notified = self.shared.notify.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();

        if self.shared.is_cancelled() {
            return Err(Status::cancelled("stream cancelled"));
        }

        tokio::select! {
            _ = notified => Err(Status::cancelled("stream cancelled")),
            sent = self.tx.send(message) => {
                sent.map_err(|_| Status::cancelled("stream closed by peer"))
            }
        }
    }

    /// Closes the sending half. The peer observes end-of-stream after
    /// draining messages already in flight.
    pub fn close_send(self) {
        drop(self.tx);
    }

    /// Cancels the pair. Pending and subsequent operations on both halves
    /// complete with `Status::cancelled`.
    pub fn cancel(&self) {
        self.shared.cancel();
    }
}

impl<T> RecvStream<T> {
    /// Receives the next message, suspending until a message arrives, the
    /// peer closes its half (`Ok(None)`), or the pair is cancelled.
    pub async fn recv(&mut self) -> Result<Option<T>, Status> {
        let notified = self.shared.notify.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();

        if self.shared.is_cancelled() {
            return Err(Status::cancelled("stream cancelled"));
        }

        tokio::select! {
            _ = notified => Err(Status::cancelled("stream cancelled")),
            message = self.rx.recv() => Ok(message),
        }
    }

    /// Cancels the pair. Pending and subsequent operations on both halves
    /// complete with `Status::cancelled`.
    pub fn cancel(&self) {
        self.shared.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn messages_arrive_in_fifo_order() {
        let (tx, mut rx) = stream_pair(4);
        for n in 0..4 {
            tx.send(n).await.unwrap();
        }
        tx.close_send();

        let mut received = Vec::new();
        while let Some(n) = rx.recv().await.unwrap() {
            received.push(n);
        }
        assert_eq!(received, vec![0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn close_send_yields_end_of_stream() {
        let (tx, mut rx) = stream_pair::<u32>(1);
        tx.close_send();
        assert_eq!(rx.recv().await.unwrap(), None);
    }

    #[tokio::test]
    async fn cancel_wakes_a_pending_recv() {
        let (tx, mut rx) = stream_pair::<u32>(1);

        let recv = tokio::spawn(async move { rx.recv().await });
        tokio::task::yield_now().await;
        tx.cancel();

        let status = recv.await.unwrap().unwrap_err();
        assert_eq!(status.code(), crate::Code::Cancelled);

        // Subsequent sends observe the cancellation as well.
        let status = tx.send(1).await.unwrap_err();
        assert_eq!(status.code(), crate::Code::Cancelled);
    }

    #[tokio::test]
    async fn cancel_from_receiver_fails_pending_send() {
        let (tx, rx) = stream_pair::<u32>(1);
        tx.send(1).await.unwrap();

        // The channel is at capacity, so this send suspends until cancel.
        let pending = tokio::spawn(async move {
            let result = tx.send(2).await;
            (tx, result)
        });
        tokio::task::yield_now().await;
        rx.cancel();

        let (_tx, result) = pending.await.unwrap();
        assert_eq!(result.unwrap_err().code(), crate::Code::Cancelled);
    }

    #[tokio::test]
    async fn dropped_receiver_fails_send() {
        let (tx, rx) = stream_pair::<u32>(1);
        drop(rx);
        let status = tx.send(1).await.unwrap_err();
        assert_eq!(status.code(), crate::Code::Cancelled);
    }
}
