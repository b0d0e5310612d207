use std::marker::PhantomData;

use bytes::Bytes;
use futures::future::BoxFuture;
use protonic::Message;

use crate::{RecvStream, SendStream, Status};

/// The transport abstraction generated clients call into.
///
/// A `Channel` is owned by the caller and shared with the generated client,
/// which only ever sees encoded request and response payloads. Deadlines
/// travel out-of-band in the channel implementation; expiry surfaces as a
/// `Status` with `Code::DeadlineExceeded` at the next suspension point.
pub trait Channel: Send + Sync {
    /// Issues a unary call: one request payload, one response payload.
    fn unary(&self, path: &'static str, request: Bytes)
        -> BoxFuture<'static, Result<Bytes, Status>>;

    /// Issues a server-streaming call: one request payload, a stream of
    /// response payloads.
    fn server_streaming(
        &self,
        path: &'static str,
        request: Bytes,
    ) -> BoxFuture<'static, Result<RecvStream<Bytes>, Status>>;

    /// Issues a client-streaming call: a stream of request payloads,
    /// resolved by a single response payload once the sender closes.
    fn client_streaming(
        &self,
        path: &'static str,
    ) -> (SendStream<Bytes>, BoxFuture<'static, Result<Bytes, Status>>);

    /// Issues a bidirectional streaming call. The two directions proceed
    /// concurrently and independently.
    fn bidi_streaming(&self, path: &'static str) -> (SendStream<Bytes>, RecvStream<Bytes>);
}

/// A typed view over a byte-level [`SendStream`] which encodes each
/// message before handing it to the transport.
pub struct EncodeSink<T> {
    inner: SendStream<Bytes>,
    _marker: PhantomData<fn(T)>,
}

impl<T> EncodeSink<T>
where
    T: Message,
{
    pub fn new(inner: SendStream<Bytes>) -> Self {
        EncodeSink {
            inner,
            _marker: PhantomData,
        }
    }

    /// Encodes and sends one message.
    pub async fn send(&self, message: &T) -> Result<(), Status> {
        self.inner.send(Bytes::from(message.encode_to_vec())).await
    }

    /// Closes the sending half of the call.
    pub fn close_send(self) {
        self.inner.close_send();
    }

    /// Cancels the underlying stream pair.
    pub fn cancel(&self) {
        self.inner.cancel();
    }
}

/// A typed view over a byte-level [`RecvStream`] which decodes each
/// payload produced by the transport.
pub struct DecodeStream<T> {
    inner: RecvStream<Bytes>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> DecodeStream<T>
where
    T: Message + Default,
{
    pub fn new(inner: RecvStream<Bytes>) -> Self {
        DecodeStream {
            inner,
            _marker: PhantomData,
        }
    }

    /// Receives and decodes the next message; `Ok(None)` marks the end of
    /// the stream. A payload that fails to decode surfaces as an internal
    /// status.
    pub async fn recv(&mut self) -> Result<Option<T>, Status> {
        match self.inner.recv().await? {
            Some(payload) => T::decode(payload)
                .map(Some)
                .map_err(|error| Status::internal(error.to_string())),
            None => Ok(None),
        }
    }

    /// Cancels the underlying stream pair.
    pub fn cancel(&self) {
        self.inner.cancel();
    }
}
