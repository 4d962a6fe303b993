use std::time::Duration;

use sea_orm::Database;
use tracing::{error, info};

use orderflow_bus::{KafkaConsumer, run_consumer};
use orderflow_core::shutdown::shutdown_token;
use orderflow_core::tracing::init_tracing;
use orderflow_proto::orders::orders_server::OrdersServer;

use orderflow_orders::config::OrdersConfig;
use orderflow_orders::consumer::PaymentsEventsProcessor;
use orderflow_orders::grpc_server::OrdersGrpcServer;
use orderflow_orders::router::build_router;
use orderflow_orders::state::AppState;
use orderflow_orders::usecase::apply_payment::ApplyPaymentUseCase;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = OrdersConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let redis_cfg = deadpool_redis::Config::from_url(&config.redis_url);
    let redis = redis_cfg
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .expect("failed to create Redis pool");

    let consumer = KafkaConsumer::new(
        &config.kafka_brokers,
        &config.consumer_group,
        &config.consumer_topic,
    )
    .expect("failed to create bus consumer");

    let state = AppState {
        db,
        redis,
        status_ttl: Duration::from_secs(config.status_ttl_secs),
    };

    let cancel = shutdown_token();

    // payments.events consumer: inbox dedup + status state machine.
    let consumer_state = state.clone();
    let consumer_cancel = cancel.child_token();
    let consumer_topic = config.consumer_topic.clone();
    tokio::spawn(async move {
        info!(topic = %consumer_topic, "orders consumer starting");
        let inbox = consumer_state.inbox_store();
        let processor = PaymentsEventsProcessor {
            apply: ApplyPaymentUseCase {
                repo: consumer_state.order_repo(),
                cache: consumer_state.status_cache(),
            },
        };
        if let Err(e) = run_consumer(&consumer, &inbox, &processor, consumer_cancel).await {
            error!(error = %e, "orders consumer stopped with error");
        }
    });

    // gRPC server
    let grpc_state = state.clone();
    let grpc_addr = format!("0.0.0.0:{}", config.grpc_port);
    let grpc_cancel = cancel.child_token();
    tokio::spawn(async move {
        let server = OrdersGrpcServer { state: grpc_state };
        info!("orders gRPC server listening on {grpc_addr}");
        tonic::transport::Server::builder()
            .add_service(OrdersServer::new(server))
            .serve_with_shutdown(
                grpc_addr.parse().expect("invalid gRPC address"),
                grpc_cancel.cancelled(),
            )
            .await
            .expect("gRPC server error");
    });

    // HTTP health server
    let router = build_router();
    let http_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .expect("failed to bind");

    info!("orders service listening on {http_addr}");
    let http_cancel = cancel.child_token();
    axum::serve(listener, router)
        .with_graceful_shutdown(async move { http_cancel.cancelled().await })
        .await
        .expect("server error");

    info!("orders service stopped");
}
