use application::{auth, config, logging, server, shutdown, Args};
use service::infra::{auth::Jwt, postgres, Postgres};
use tracing as log;

postgres::embed_migrations!("../migrations/auth");

#[tokio::main]
async fn main() {
    logging::init();

    _ = start().await;
}

async fn start() -> Result<(), ()> {
    let Args { config } = Args::parse().map_err(|e| {
        log::error!("failed to parse command line arguments: {e}");
    })?;

    let config::Auth {
        server: server_conf,
        rpc: rpc_conf,
        jwt,
        postgres,
        shutdown: shutdown_conf,
        log,
    } = config::Auth::new(config).map_err(|e| {
        log::error!("failed to load `config::Auth`: {e}");
    })?;

    logging::set_level(log.level);

    let min_connections = postgres.min_connections;
    let mut postgres = Postgres::new(&postgres.into()).map_err(|e| {
        log::error!("failed to initialize `Postgres` client: {e}");
    })?;

    migrations::runner()
        .set_migration_table_name("auth_schema_history")
        .run_async(&mut postgres)
        .await
        .map_err(|e| {
            log::error!("failed to run database migrations: {e}");
        })?;

    postgres.warm_up(min_connections).await.map_err(|e| {
        log::error!("failed to establish `Postgres` connections: {e}");
    })?;

    let service =
        auth::Service::new(postgres.clone(), Jwt::new(jwt.secret.as_bytes()));

    let (trigger, signal) = shutdown::channel();
    let servers = vec![
        server::spawn(
            auth::router(service.clone()),
            &server_conf,
            signal.clone(),
        )
        .await
        .map_err(|e| {
            log::error!(
                "failed to listen on `{}:{}`: {e}",
                server_conf.host,
                server_conf.port,
            );
        })?,
        auth::Rpc::new(service)
            .spawn(&rpc_conf, signal)
            .await
            .map_err(|e| {
                log::error!(
                    "failed to listen on `{}:{}`: {e}",
                    rpc_conf.host,
                    rpc_conf.port,
                );
            })?,
    ];

    shutdown::serve_until_signal(servers, trigger, shutdown_conf.timeout)
        .await;

    postgres.close();
    log::info!("stopped");

    Ok(())
}
