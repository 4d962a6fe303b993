use tonic::Status;

/// Orders service error variants mapped to gRPC status codes.
#[derive(Debug, thiserror::Error)]
pub enum OrdersServiceError {
    #[error("{0}")]
    InvalidArgument(String),
    #[error("order not found")]
    OrderNotFound,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl From<OrdersServiceError> for Status {
    fn from(err: OrdersServiceError) -> Self {
        match err {
            OrdersServiceError::InvalidArgument(msg) => Status::invalid_argument(msg),
            OrdersServiceError::OrderNotFound => Status::not_found("order not found"),
            OrdersServiceError::Internal(e) => {
                tracing::error!(error = %e, "internal error");
                Status::internal("internal error")
            }
        }
    }
}
