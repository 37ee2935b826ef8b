use application::{chat, config, logging, server, shutdown, Args};
use service::infra::{auth::Grpc, postgres, Postgres};
use tracing as log;

postgres::embed_migrations!("../migrations/chat");

#[tokio::main]
async fn main() {
    logging::init();

    _ = start().await;
}

async fn start() -> Result<(), ()> {
    let Args { config } = Args::parse().map_err(|e| {
        log::error!("failed to parse command line arguments: {e}");
    })?;

    let config::Chat {
        server: server_conf,
        auth: auth_conf,
        postgres,
        shutdown: shutdown_conf,
        log,
    } = config::Chat::new(config).map_err(|e| {
        log::error!("failed to load `config::Chat`: {e}");
    })?;

    logging::set_level(log.level);

    let min_connections = postgres.min_connections;
    let mut postgres = Postgres::new(&postgres.into()).map_err(|e| {
        log::error!("failed to initialize `Postgres` client: {e}");
    })?;

    migrations::runner()
        .set_migration_table_name("chat_schema_history")
        .run_async(&mut postgres)
        .await
        .map_err(|e| {
            log::error!("failed to run database migrations: {e}");
        })?;

    postgres.warm_up(min_connections).await.map_err(|e| {
        log::error!("failed to establish `Postgres` connections: {e}");
    })?;

    // Connects on the first request.
    let grpc = Grpc::new(auth_conf.uri(), auth_conf.connect_timeout)
        .map_err(|e| {
            log::error!("failed to initialize `AuthService` client: {e}");
        })?;

    let service = chat::Service::new(postgres.clone(), grpc);

    let (trigger, signal) = shutdown::channel();
    let http = server::spawn(chat::router(service), &server_conf, signal)
        .await
        .map_err(|e| {
            log::error!(
                "failed to listen on `{}:{}`: {e}",
                server_conf.host,
                server_conf.port,
            );
        })?;

    shutdown::serve_until_signal(vec![http], trigger, shutdown_conf.timeout)
        .await;

    postgres.close();
    log::info!("stopped");

    Ok(())
}
