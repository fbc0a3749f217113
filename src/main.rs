use axum::Router;
use dotenvy::dotenv;
use tokio::net::TcpListener;

use eventhub_server::config::Config;
use eventhub_server::routes::create_routes;
use eventhub_server::store::{seed, Store};

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env();

    let store = Store::open(&config.snapshot_path).expect("Failed to open store");
    tracing::info!(path = %config.snapshot_path.display(), "Store ready");

    if config.seed_demo {
        seed::seed_demo_data(&store)
            .await
            .expect("Failed to seed demo data");
    }

    let app: Router = create_routes(store);

    tracing::info!("🚀 Server running at http://{}", config.bind_addr);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app).await.expect("Server failed");
}
