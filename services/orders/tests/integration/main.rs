mod helpers;
mod order_flow_test;
