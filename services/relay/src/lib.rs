#![allow(async_fn_in_trait)]

pub mod config;
pub mod store;
pub mod worker;
