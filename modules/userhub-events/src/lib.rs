//! In-process, topic-keyed publish/subscribe.
//!
//! One `EventBus` per process, constructed at startup and injected into the
//! resolvers that need it. Publishing enqueues into every channel currently
//! registered on the topic and never waits for consumers. Each channel is a
//! single-consumer delivery queue owned by exactly one subscriber; the bus
//! registry holds only a weak back-reference, so dropping the channel handle
//! is enough to deregister it.
//!
//! Zero knowledge of users, GraphQL, or any domain concept. Payloads are any
//! `Clone + Send` type.

mod bus;
mod channel;

pub use bus::EventBus;
pub use channel::Channel;
