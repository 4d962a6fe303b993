use orderflow_domain::order::OrderStatus;
use orderflow_gateway::error::GatewayError;
use orderflow_gateway::usecase::order_status::GetOrderStatusUseCase;

use crate::helpers::{MockOrdersPort, MockStatusCache, test_summary};

const ORDER_ID: &str = "11111111-1111-1111-1111-111111111111";

#[tokio::test]
async fn cache_hit_skips_orders_call() {
    let usecase = GetOrderStatusUseCase {
        cache: MockStatusCache::with_entry(ORDER_ID, OrderStatus::Paid),
        orders: MockOrdersPort::new(),
    };

    let status = usecase.execute(ORDER_ID).await.unwrap();
    assert_eq!(status, OrderStatus::Paid);
}

#[tokio::test]
async fn cache_miss_falls_back_and_backfills() {
    let mut orders = MockOrdersPort::new();
    orders.orders.insert(
        ORDER_ID.to_owned(),
        test_summary(ORDER_ID, OrderStatus::Cancelled),
    );
    let usecase = GetOrderStatusUseCase {
        cache: MockStatusCache::default(),
        orders,
    };

    let status = usecase.execute(ORDER_ID).await.unwrap();
    assert_eq!(status, OrderStatus::Cancelled);
    assert_eq!(
        usecase.cache.entries.lock().unwrap().get(ORDER_ID),
        Some(&OrderStatus::Cancelled)
    );
}

#[tokio::test]
async fn unknown_order_is_not_found() {
    let usecase = GetOrderStatusUseCase {
        cache: MockStatusCache::default(),
        orders: MockOrdersPort::new(),
    };

    let result = usecase.execute(ORDER_ID).await;
    assert!(matches!(result, Err(GatewayError::OrderNotFound)));
}

#[tokio::test]
async fn empty_order_id_is_invalid() {
    let usecase = GetOrderStatusUseCase {
        cache: MockStatusCache::default(),
        orders: MockOrdersPort::new(),
    };

    let result = usecase.execute("").await;
    assert!(matches!(result, Err(GatewayError::InvalidArgument(_))));
}
