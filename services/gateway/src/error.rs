use tonic::Status;

/// Gateway error variants mapped to gRPC status codes.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("{0}")]
    InvalidArgument(String),
    #[error("idempotency key reused with different payload")]
    KeyConflict,
    #[error("idempotent request is in progress, retry later")]
    InProgress,
    #[error("orders create failed: {0}")]
    OrdersUnavailable(String),
    #[error("idempotency lock failed")]
    KvUnavailable,
    #[error("order not found")]
    OrderNotFound,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl From<GatewayError> for Status {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::InvalidArgument(msg) => Status::invalid_argument(msg),
            GatewayError::KeyConflict => {
                Status::already_exists("idempotency key reused with different payload")
            }
            GatewayError::InProgress => {
                Status::aborted("idempotent request is in progress, retry later")
            }
            GatewayError::OrdersUnavailable(msg) => {
                Status::failed_precondition(format!("orders create failed: {msg}"))
            }
            GatewayError::KvUnavailable => Status::resource_exhausted("idempotency lock failed"),
            GatewayError::OrderNotFound => Status::not_found("order not found"),
            GatewayError::Internal(e) => {
                tracing::error!(error = %e, "internal error");
                Status::internal("internal error")
            }
        }
    }
}
