//! Exercises the RPC runtime the way a generated client and an in-process
//! transport use it together.

use bytes::Bytes;
use protonic::Message;
use protonic_rpc::{
    stream_pair, BoxFuture, Channel, Code, DecodeStream, EncodeSink, RecvStream, SendStream,
    Status,
};
use protonic_tests::ScalarMessage;

/// A loopback transport: unary calls echo their payload, streams echo
/// whatever the client sends.
struct EchoChannel;

impl Channel for EchoChannel {
    fn unary(
        &self,
        _path: &'static str,
        request: Bytes,
    ) -> BoxFuture<'static, Result<Bytes, Status>> {
        Box::pin(async move { Ok(request) })
    }

    fn server_streaming(
        &self,
        _path: &'static str,
        request: Bytes,
    ) -> BoxFuture<'static, Result<RecvStream<Bytes>, Status>> {
        Box::pin(async move {
            let (tx, rx) = stream_pair(4);
            tokio::spawn(async move {
                for _ in 0..3 {
                    if tx.send(request.clone()).await.is_err() {
                        return;
                    }
                }
                tx.close_send();
            });
            Ok(rx)
        })
    }

    fn client_streaming(
        &self,
        _path: &'static str,
    ) -> (SendStream<Bytes>, BoxFuture<'static, Result<Bytes, Status>>) {
        let (tx, mut rx) = stream_pair(4);
        let response: BoxFuture<'static, Result<Bytes, Status>> = Box::pin(async move {
            let mut last = Bytes::new();
            while let Some(payload) = rx.recv().await? {
                last = payload;
            }
            Ok(last)
        });
        (tx, response)
    }

    fn bidi_streaming(&self, _path: &'static str) -> (SendStream<Bytes>, RecvStream<Bytes>) {
        let (request_tx, mut request_rx) = stream_pair::<Bytes>(4);
        let (response_tx, response_rx) = stream_pair::<Bytes>(4);
        tokio::spawn(async move {
            while let Ok(Some(payload)) = request_rx.recv().await {
                if response_tx.send(payload).await.is_err() {
                    return;
                }
            }
            response_tx.close_send();
        });
        (request_tx, response_rx)
    }
}

/// A transport that fails every operation, for status propagation checks.
struct FailingChannel(Code);

impl Channel for FailingChannel {
    fn unary(
        &self,
        _path: &'static str,
        _request: Bytes,
    ) -> BoxFuture<'static, Result<Bytes, Status>> {
        let status = Status::new(self.0, "transport failure");
        Box::pin(async move { Err(status) })
    }

    fn server_streaming(
        &self,
        _path: &'static str,
        _request: Bytes,
    ) -> BoxFuture<'static, Result<RecvStream<Bytes>, Status>> {
        let status = Status::new(self.0, "transport failure");
        Box::pin(async move { Err(status) })
    }

    fn client_streaming(
        &self,
        _path: &'static str,
    ) -> (SendStream<Bytes>, BoxFuture<'static, Result<Bytes, Status>>) {
        let (tx, _rx) = stream_pair(1);
        let status = Status::new(self.0, "transport failure");
        let response: BoxFuture<'static, Result<Bytes, Status>> =
            Box::pin(async move { Err(status) });
        (tx, response)
    }

    fn bidi_streaming(&self, _path: &'static str) -> (SendStream<Bytes>, RecvStream<Bytes>) {
        let (tx, rx) = stream_pair(1);
        tx.cancel();
        (tx, rx)
    }
}

/// A client written the way the code generator emits them.
struct GreeterClient<C> {
    channel: C,
}

impl<C> GreeterClient<C>
where
    C: Channel,
{
    fn new(channel: C) -> Self {
        Self { channel }
    }

    async fn say_hello(&self, request: &ScalarMessage) -> Result<ScalarMessage, Status> {
        let payload = Bytes::from(Message::encode_to_vec(request));
        let response = self.channel.unary("/test.Greeter/SayHello", payload).await?;
        ScalarMessage::decode(response).map_err(|error| Status::internal(error.to_string()))
    }

    async fn lots_of_replies(
        &self,
        request: &ScalarMessage,
    ) -> Result<DecodeStream<ScalarMessage>, Status> {
        let payload = Bytes::from(Message::encode_to_vec(request));
        let responses = self
            .channel
            .server_streaming("/test.Greeter/LotsOfReplies", payload)
            .await?;
        Ok(DecodeStream::new(responses))
    }

    fn bidi_hello(
        &self,
    ) -> (
        EncodeSink<ScalarMessage>,
        DecodeStream<ScalarMessage>,
    ) {
        let (requests, responses) = self.channel.bidi_streaming("/test.Greeter/BidiHello");
        (EncodeSink::new(requests), DecodeStream::new(responses))
    }
}

fn sample(a: i32) -> ScalarMessage {
    ScalarMessage {
        a,
        b: format!("message {}", a),
        ..Default::default()
    }
}

#[tokio::test]
async fn unary_calls_roundtrip_through_the_channel() {
    let client = GreeterClient::new(EchoChannel);
    let request = sample(1);
    let response = client.say_hello(&request).await.unwrap();
    assert_eq!(response, request);
}

#[tokio::test]
async fn server_streams_deliver_in_order_until_end() {
    let client = GreeterClient::new(EchoChannel);
    let mut responses = client.lots_of_replies(&sample(2)).await.unwrap();

    let mut count = 0;
    while let Some(message) = responses.recv().await.unwrap() {
        assert_eq!(message, sample(2));
        count += 1;
    }
    assert_eq!(count, 3);
}

#[tokio::test]
async fn bidi_streams_are_full_duplex_fifo() {
    let client = GreeterClient::new(EchoChannel);
    let (requests, mut responses) = client.bidi_hello();

    for n in 0..4 {
        requests.send(&sample(n)).await.unwrap();
    }
    requests.close_send();

    let mut received = Vec::new();
    while let Some(message) = responses.recv().await.unwrap() {
        received.push(message.a);
    }
    assert_eq!(received, vec![0, 1, 2, 3]);
}

#[tokio::test]
async fn statuses_propagate_end_to_end() {
    let client = GreeterClient::new(FailingChannel(Code::DeadlineExceeded));
    let error = client.say_hello(&sample(3)).await.unwrap_err();
    assert_eq!(error.code(), Code::DeadlineExceeded);
    assert_eq!(error.message(), "transport failure");
}

#[tokio::test]
async fn cancelled_bidi_streams_fail_both_directions() {
    let client = GreeterClient::new(FailingChannel(Code::Unavailable));
    let (requests, mut responses) = client.bidi_hello();

    let send_error = requests.send(&sample(4)).await.unwrap_err();
    assert_eq!(send_error.code(), Code::Cancelled);

    let recv_error = responses.recv().await.unwrap_err();
    assert_eq!(recv_error.code(), Code::Cancelled);
}
