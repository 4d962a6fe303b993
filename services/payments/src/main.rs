use sea_orm::Database;
use tracing::{error, info};

use orderflow_bus::{KafkaConsumer, run_consumer};
use orderflow_core::shutdown::shutdown_token;
use orderflow_core::tracing::init_tracing;

use orderflow_payments::config::PaymentsConfig;
use orderflow_payments::consumer::OrdersEventsProcessor;
use orderflow_payments::router::build_router;
use orderflow_payments::state::AppState;
use orderflow_payments::usecase::process_order::ProcessOrderUseCase;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = PaymentsConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let consumer = KafkaConsumer::new(
        &config.kafka_brokers,
        &config.consumer_group,
        &config.consumer_topic,
    )
    .expect("failed to create bus consumer");

    let state = AppState { db };
    let cancel = shutdown_token();

    // orders.events consumer: inbox dedup + acquiring decision.
    let consumer_state = state.clone();
    let consumer_cancel = cancel.child_token();
    let consumer_topic = config.consumer_topic.clone();
    tokio::spawn(async move {
        info!(topic = %consumer_topic, "payments consumer starting");
        let inbox = consumer_state.inbox_store();
        let processor = OrdersEventsProcessor {
            process_order: ProcessOrderUseCase {
                repo: consumer_state.payment_repo(),
            },
        };
        if let Err(e) = run_consumer(&consumer, &inbox, &processor, consumer_cancel).await {
            error!(error = %e, "payments consumer stopped with error");
        }
    });

    // HTTP health server
    let router = build_router();
    let http_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .expect("failed to bind");

    info!("payments service listening on {http_addr}");
    let http_cancel = cancel.child_token();
    axum::serve(listener, router)
        .with_graceful_shutdown(async move { http_cancel.cancelled().await })
        .await
        .expect("server error");

    info!("payments service stopped");
}
