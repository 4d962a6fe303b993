use std::time::Duration;

use tracing::info;

use orderflow_core::shutdown::shutdown_token;
use orderflow_core::tracing::init_tracing;
use orderflow_proto::checkout::checkout_server::CheckoutServer;

use orderflow_gateway::config::GatewayConfig;
use orderflow_gateway::grpc_server::CheckoutGrpcServer;
use orderflow_gateway::infra::orders_client::GrpcOrdersPort;
use orderflow_gateway::router::build_router;
use orderflow_gateway::state::AppState;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = GatewayConfig::from_env();

    let redis_cfg = deadpool_redis::Config::from_url(&config.redis_url);
    let redis = redis_cfg
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .expect("failed to create Redis pool");

    let orders_channel = tonic::transport::Channel::from_shared(config.orders_grpc_url.clone())
        .expect("invalid ORDERS_GRPC_URL")
        .connect_lazy();

    let state = AppState {
        redis,
        orders: GrpcOrdersPort::new(
            orders_channel,
            Duration::from_millis(config.orders_timeout_ms),
        ),
        status_ttl: Duration::from_secs(config.status_ttl_secs),
    };

    let cancel = shutdown_token();

    // Checkout gRPC server
    let grpc_state = state.clone();
    let grpc_addr = format!("0.0.0.0:{}", config.grpc_port);
    let grpc_cancel = cancel.child_token();
    tokio::spawn(async move {
        let server = CheckoutGrpcServer { state: grpc_state };
        info!("gateway gRPC server listening on {grpc_addr}");
        tonic::transport::Server::builder()
            .add_service(CheckoutServer::new(server))
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

    info!("gateway listening on {http_addr}");
    let http_cancel = cancel.child_token();
    axum::serve(listener, router)
        .with_graceful_shutdown(async move { http_cancel.cancelled().await })
        .await
        .expect("server error");

    info!("gateway stopped");
}
