pub mod orders;
pub mod orders_inbox;
pub mod orders_outbox;
