use std::time::Duration;

use tonic::transport::Channel;
use tonic::{Code, Request};
use tracing::warn;

use orderflow_domain::order::OrderStatus;
use orderflow_proto::orders::{
    CreateOrderRequest, GetOrderRequest, OrderStatus as PbOrderStatus,
    orders_client::OrdersClient,
};

use crate::domain::repository::OrdersPort;
use crate::domain::types::OrderSummary;
use crate::error::GatewayError;

#[derive(Clone)]
pub struct GrpcOrdersPort {
    client: OrdersClient<Channel>,
    timeout: Duration,
}

impl GrpcOrdersPort {
    pub fn new(channel: Channel, timeout: Duration) -> Self {
        Self {
            client: OrdersClient::new(channel),
            timeout,
        }
    }
}

impl OrdersPort for GrpcOrdersPort {
    async fn create_order(
        &self,
        user_id: &str,
        amount_cents: i64,
        currency: &str,
    ) -> Result<OrderSummary, GatewayError> {
        let mut request = Request::new(CreateOrderRequest {
            user_id: user_id.to_owned(),
            amount_cents,
            currency: currency.to_owned(),
        });
        request.set_timeout(self.timeout);

        match self.client.clone().create_order(request).await {
            Ok(response) => {
                let resp = response.into_inner();
                Ok(OrderSummary {
                    status: from_pb_status(resp.status()),
                    order_id: resp.order_id,
                    currency: resp.currency,
                    total_amount: resp.total_amount,
                    created_at: resp.created_at,
                })
            }
            Err(status) => {
                warn!(code = ?status.code(), message = status.message(), "orders create failed");
                Err(GatewayError::OrdersUnavailable(status.message().to_owned()))
            }
        }
    }

    async fn get_order(&self, order_id: &str) -> Result<OrderSummary, GatewayError> {
        let mut request = Request::new(GetOrderRequest {
            order_id: order_id.to_owned(),
        });
        request.set_timeout(self.timeout);

        match self.client.clone().get_order(request).await {
            Ok(response) => {
                let resp = response.into_inner();
                Ok(OrderSummary {
                    status: from_pb_status(resp.status()),
                    order_id: resp.order_id,
                    currency: resp.currency,
                    total_amount: resp.total_amount,
                    created_at: resp.created_at,
                })
            }
            Err(status) if status.code() == Code::NotFound => Err(GatewayError::OrderNotFound),
            Err(status) => {
                warn!(code = ?status.code(), message = status.message(), "orders get failed");
                Err(GatewayError::Internal(anyhow::anyhow!(
                    "gRPC get_order failed: {status}"
                )))
            }
        }
    }
}

/// The orders service never emits `Unspecified`; treat it as the initial
/// state if it ever shows up.
fn from_pb_status(status: PbOrderStatus) -> OrderStatus {
    match status {
        PbOrderStatus::Paid => OrderStatus::Paid,
        PbOrderStatus::Cancelled => OrderStatus::Cancelled,
        PbOrderStatus::New | PbOrderStatus::Unspecified => OrderStatus::New,
    }
}
