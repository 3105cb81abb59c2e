//! RSVP Hub HTTP server.
//!
//! Event attendance with capacity-safe join/leave and live member updates.

use std::sync::Arc;

use http::{header, HeaderValue, Method};
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use rsvp_hub::adapters::http::{app_router, AuthState, EventsAppState};
use rsvp_hub::adapters::redis::{spawn_listener, RedisChangeRelay};
use rsvp_hub::adapters::websocket::{ChangeBus, WebSocketState};
use rsvp_hub::adapters::{InMemoryEventStore, JwtSessionValidator, PostgresEventStore};
use rsvp_hub::application::MembershipRegistry;
use rsvp_hub::config::{AppConfig, ConfigError, SeedEvent};
use rsvp_hub::ports::{EventStore, MemberUpdatePublisher, SessionValidator};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config);

    config.validate()?;
    info!(
        environment = ?config.server.environment,
        database = config.database.is_some(),
        relay = config.redis.is_some(),
        "Configuration loaded"
    );

    let store: Arc<dyn EventStore> = match &config.database {
        Some(database) => {
            info!("Connecting to PostgreSQL...");
            let pool = database.pool_options().connect(&database.url).await?;
            if database.run_migrations {
                sqlx::migrate!().run(&pool).await?;
                info!("Migrations applied");
            }
            if config.membership.seed_file.is_some() {
                warn!("membership.seed_file is ignored when a database is configured");
            }
            Arc::new(PostgresEventStore::new(pool))
        }
        None => {
            warn!("No database configured, events are kept in memory");
            Arc::new(seeded_memory_store(&config)?)
        }
    };

    let bus = Arc::new(ChangeBus::new(config.membership.session_buffer));

    // With a relay every node, this one included, hears updates through the
    // listener, so the registry publishes to Redis only.
    let mut relay_listener = None;
    let publisher: Arc<dyn MemberUpdatePublisher> = match &config.redis {
        Some(redis_config) => {
            info!("Connecting to Redis relay...");
            let client = redis::Client::open(redis_config.url.as_str())?;
            let relay = RedisChangeRelay::connect(&client).await?;
            relay_listener = Some(spawn_listener(
                client,
                bus.clone(),
                redis_config.reconnect_delay(),
            ));
            Arc::new(relay)
        }
        None => bus.clone(),
    };

    let registry = Arc::new(MembershipRegistry::new(
        store,
        publisher,
        config.membership.store_timeout(),
    ));

    let validator: Arc<dyn SessionValidator> =
        Arc::new(JwtSessionValidator::new(&config.auth.jwt_secret));
    let auth = AuthState::new(validator, config.auth.cookie_name.as_str());

    let events = EventsAppState::new(registry);
    let live = WebSocketState::new(bus.clone(), Arc::new(events.get_event_handler()));

    let app = app_router(events, live, auth).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(build_cors(&config.server.cors_origins_list()))
            .layer(TimeoutLayer::new(config.server.request_timeout())),
    );

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = relay_listener {
        handle.abort();
    }
    bus.shutdown();

    info!("Server stopped");
    Ok(())
}

/// In-memory store loaded from `membership.seed_file`.
fn seeded_memory_store(config: &AppConfig) -> Result<InMemoryEventStore, ConfigError> {
    let events = config
        .membership
        .seed_events()?
        .into_iter()
        .map(SeedEvent::into_event)
        .collect::<Result<Vec<_>, _>>()?;

    for event in &events {
        info!(
            event_id = %event.id(),
            name = event.name(),
            capacity = event.capacity().get(),
            "Seeded event"
        );
    }
    if events.is_empty() {
        warn!("No seed events, every event lookup will return 404");
    }
    Ok(InMemoryEventStore::with_events(events))
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Explicit origin list; no origins means same-origin only.
fn build_cors(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully...");
        },
        () = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully...");
        },
    }
}
