use tonic::{Request, Response, Status};
use uuid::Uuid;

use orderflow_domain::order::OrderStatus;
use orderflow_proto::orders::{
    CreateOrderRequest, CreateOrderResponse, GetOrderRequest, GetOrderResponse,
    OrderStatus as PbOrderStatus, orders_server::Orders,
};

use crate::domain::repository::OrderRepository as _;
use crate::error::OrdersServiceError;
use crate::state::AppState;
use crate::usecase::create_order::{CreateOrderInput, CreateOrderUseCase};

#[derive(Clone)]
pub struct OrdersGrpcServer {
    pub state: AppState,
}

#[tonic::async_trait]
impl Orders for OrdersGrpcServer {
    async fn create_order(
        &self,
        request: Request<CreateOrderRequest>,
    ) -> Result<Response<CreateOrderResponse>, Status> {
        let req = request.into_inner();
        if req.user_id.is_empty() || req.amount_cents <= 0 {
            return Err(Status::invalid_argument(
                "user_id and positive amount_cents are required",
            ));
        }
        let user_id = req
            .user_id
            .parse::<Uuid>()
            .map_err(|_| Status::invalid_argument("invalid user_id"))?;

        let usecase = CreateOrderUseCase {
            repo: self.state.order_repo(),
        };
        let order = usecase
            .execute(CreateOrderInput {
                user_id,
                amount_cents: req.amount_cents,
                currency: req.currency,
            })
            .await
            .map_err(Status::from)?;

        Ok(Response::new(CreateOrderResponse {
            order_id: order.id.to_string(),
            status: to_pb_status(order.status) as i32,
            currency: order.currency,
            total_amount: order.total_amount,
            created_at: order.created_at.to_rfc3339(),
        }))
    }

    async fn get_order(
        &self,
        request: Request<GetOrderRequest>,
    ) -> Result<Response<GetOrderResponse>, Status> {
        let order_id = request
            .into_inner()
            .order_id
            .parse::<Uuid>()
            .map_err(|_| Status::invalid_argument("invalid order_id"))?;

        let order = self
            .state
            .order_repo()
            .find_by_id(order_id)
            .await
            .map_err(Status::from)?
            .ok_or_else(|| Status::from(OrdersServiceError::OrderNotFound))?;

        Ok(Response::new(GetOrderResponse {
            order_id: order.id.to_string(),
            status: to_pb_status(order.status) as i32,
            currency: order.currency,
            total_amount: order.total_amount,
            created_at: order.created_at.to_rfc3339(),
        }))
    }
}

pub fn to_pb_status(status: OrderStatus) -> PbOrderStatus {
    match status {
        OrderStatus::New => PbOrderStatus::New,
        OrderStatus::Paid => PbOrderStatus::Paid,
        OrderStatus::Cancelled => PbOrderStatus::Cancelled,
    }
}
