#![doc(html_root_url = "https://docs.rs/protonic-rpc/0.1.0")]

//! Transport-agnostic RPC runtime types for Protonic-generated services.
//!
//! The code generator emits, per `service` definition, a client struct
//! generic over a [`Channel`], a server trait, and a [`ServiceDescriptor`]
//! constant. This crate supplies the shared vocabulary those artifacts are
//! written against: [`Status`]/[`Code`], the [`SendStream`]/[`RecvStream`]
//! pair, and the typed [`EncodeSink`]/[`DecodeStream`] adapters.
//!
//! No concrete transport lives here; gRPC, in-process, or any other
//! transport is supplied by the caller as a [`Channel`] implementation.

mod channel;
mod descriptor;
mod status;
mod streams;

pub use crate::channel::{Channel, DecodeStream, EncodeSink};
pub use crate::descriptor::{MethodDescriptor, ServiceDescriptor};
pub use crate::status::{Code, Status};
pub use crate::streams::{stream_pair, RecvStream, SendStream};

// Re-exported for generated server traits and client signatures.
pub use async_trait::async_trait;
pub use futures::future::BoxFuture;
