//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod backend_query_adapter;
mod whatsapp_adapter;

pub use backend_query_adapter::BackendQueryAdapter;
pub use whatsapp_adapter::WhatsAppMessengerAdapter;
