/// A record to be published. `key` is the partitioning key — producers use
/// the aggregate id so the bus preserves per-aggregate ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRecord {
    pub topic: String,
    pub key: Vec<u8>,
    pub headers: Vec<(String, String)>,
    pub payload: Vec<u8>,
}

/// A record as consumed from the bus. `(topic, partition, offset)` uniquely
/// identifies the record and keys the inbox dedup table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundRecord {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
    pub key: Vec<u8>,
    pub headers: Vec<(String, String)>,
    pub payload: Vec<u8>,
}
