// Adapters layer: concrete implementations for external systems.

pub mod ticket_store;

pub use ticket_store::{save_validated, JsonFileTicketStore};
