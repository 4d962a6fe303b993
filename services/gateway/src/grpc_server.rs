use tonic::metadata::MetadataMap;
use tonic::{Request, Response, Status};

use orderflow_domain::order::OrderStatus;
use orderflow_proto::checkout::{
    CreateOrderRequest, CreateOrderResponse, GetOrderStatusRequest, GetOrderStatusResponse,
    OrderStatus as PbOrderStatus, checkout_server::Checkout,
};

use crate::domain::types::OrderSummary;
use crate::state::AppState;
use crate::usecase::create_order::{CreateCheckoutInput, CreateCheckoutUseCase};
use crate::usecase::order_status::GetOrderStatusUseCase;

/// Metadata names honored for the client idempotency key, in priority order.
const IDEMPOTENCY_KEY_HEADERS: [&str; 2] = ["idempotency-key", "x-idempotency-key"];

#[derive(Clone)]
pub struct CheckoutGrpcServer {
    pub state: AppState,
}

#[tonic::async_trait]
impl Checkout for CheckoutGrpcServer {
    async fn create_order(
        &self,
        request: Request<CreateOrderRequest>,
    ) -> Result<Response<CreateOrderResponse>, Status> {
        let idempotency_key = extract_idempotency_key(request.metadata());
        let req = request.into_inner();

        let usecase = CreateCheckoutUseCase {
            store: self.state.idem_store(),
            orders: self.state.orders_port(),
        };
        let summary = usecase
            .execute(CreateCheckoutInput {
                user_id: req.user_id,
                amount_cents: req.amount_cents,
                currency: req.currency,
                idempotency_key,
            })
            .await
            .map_err(Status::from)?;

        Ok(Response::new(to_pb_response(summary)))
    }

    async fn get_order_status(
        &self,
        request: Request<GetOrderStatusRequest>,
    ) -> Result<Response<GetOrderStatusResponse>, Status> {
        let order_id = request.into_inner().order_id;

        let usecase = GetOrderStatusUseCase {
            cache: self.state.status_cache(),
            orders: self.state.orders_port(),
        };
        let status = usecase.execute(&order_id).await.map_err(Status::from)?;

        Ok(Response::new(GetOrderStatusResponse {
            order_id,
            status: to_pb_status(status) as i32,
        }))
    }
}

fn extract_idempotency_key(metadata: &MetadataMap) -> Option<String> {
    for name in IDEMPOTENCY_KEY_HEADERS {
        if let Some(value) = metadata.get(name) {
            if let Ok(value) = value.to_str() {
                let value = value.trim();
                if !value.is_empty() {
                    return Some(value.to_owned());
                }
            }
        }
    }
    None
}

fn to_pb_response(summary: OrderSummary) -> CreateOrderResponse {
    CreateOrderResponse {
        order_id: summary.order_id,
        status: to_pb_status(summary.status) as i32,
        currency: summary.currency,
        total_amount: summary.total_amount,
        created_at: summary.created_at,
    }
}

fn to_pb_status(status: OrderStatus) -> PbOrderStatus {
    match status {
        OrderStatus::New => PbOrderStatus::New,
        OrderStatus::Paid => PbOrderStatus::Paid,
        OrderStatus::Cancelled => PbOrderStatus::Cancelled,
    }
}
