mod helpers;
mod idempotency_test;
mod order_status_test;
