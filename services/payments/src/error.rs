/// Payments service error variants. The service has no RPC surface — errors
/// end up in consumer logs and keep the inbox row unprocessed.
#[derive(Debug, thiserror::Error)]
pub enum PaymentsServiceError {
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}
