mod payment_flow_test;
