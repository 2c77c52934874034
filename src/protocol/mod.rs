//! Client half of the line protocol spoken with the external route service.
//!
//! A request is two lines, `"<lat> <lon>"` for each dot of a completed pair.
//! The response is any number of `"<lat> <lon>"` waypoint lines terminated by
//! a line holding only `"E"`.

pub mod channel;
pub mod client;
pub mod transport;

pub use channel::{LineChannel, NoticeRoute, StreamChannel};
pub use client::{ExchangeState, ProtocolClient, ProtocolNotice, ResponseLine, RouteResponse};
