use thiserror::Error;

#[derive(Debug, Error)]
pub enum BusError {
    #[error("bus configuration error: {0}")]
    Config(String),

    #[error("produce failed: {0}")]
    Produce(String),

    #[error("consume failed: {0}")]
    Consume(String),

    /// The record source is exhausted; consumer loops end cleanly on this.
    #[error("bus closed")]
    Closed,
}
