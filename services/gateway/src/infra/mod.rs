pub mod kv;
pub mod orders_client;
