//! Domain entities - short-lived values created per inbound message

mod inbound_event;
mod outbound_reply;

pub use inbound_event::InboundEvent;
pub use outbound_reply::OutboundReply;
