mod config;
mod delivery;
mod domain;
mod repository;
mod telemetry;
mod usecase;

use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::State,
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::delivery::http::v1::{
    accommodations, admin, auth, bookings, destinations, engagement, home, preferences, profile,
    reviews,
};
use crate::delivery::http::v1::middleware::auth_middleware;
use crate::repository::postgres::{
    create_pool, PostgresAccommodationRepository, PostgresActivityRepository,
    PostgresAmenityRepository, PostgresBookingRepository, PostgresCityRepository,
    PostgresDestinationRepository, PostgresEngagementRepository, PostgresPreferenceRepository,
    PostgresReviewRepository, PostgresStatsRepository, PostgresUserRepository,
};
use crate::usecase::accommodations::AccommodationsUseCase;
use crate::usecase::auth::AuthUseCase;
use crate::usecase::bookings::BookingsUseCase;
use crate::usecase::catalog::{ActivitiesUseCase, AmenitiesUseCase, CitiesUseCase};
use crate::usecase::destinations::DestinationsUseCase;
use crate::usecase::engagement::EngagementUseCase;
use crate::usecase::home::HomeUseCase;
use crate::usecase::jwt::JwtService;
use crate::usecase::preferences::PreferencesUseCase;
use crate::usecase::reviews::ReviewsUseCase;

pub struct AppState {
    pub auth_usecase: AuthUseCase<PostgresUserRepository>,
    pub jwt_service: JwtService,
    pub cities_usecase: CitiesUseCase<PostgresCityRepository>,
    pub activities_usecase: ActivitiesUseCase<PostgresActivityRepository>,
    pub amenities_usecase: AmenitiesUseCase<PostgresAmenityRepository>,
    pub preferences_usecase: PreferencesUseCase<PostgresPreferenceRepository>,
    pub destinations_usecase: DestinationsUseCase<
        PostgresDestinationRepository,
        PostgresCityRepository,
        PostgresReviewRepository,
        PostgresEngagementRepository,
    >,
    pub accommodations_usecase: AccommodationsUseCase<
        PostgresAccommodationRepository,
        PostgresCityRepository,
        PostgresReviewRepository,
        PostgresBookingRepository,
    >,
    pub reviews_usecase: ReviewsUseCase<PostgresReviewRepository>,
    pub engagement_usecase: EngagementUseCase<
        PostgresEngagementRepository,
        PostgresDestinationRepository,
        PostgresReviewRepository,
    >,
    pub bookings_usecase: BookingsUseCase<PostgresBookingRepository>,
    pub home_usecase: HomeUseCase<
        PostgresDestinationRepository,
        PostgresAccommodationRepository,
        PostgresPreferenceRepository,
        PostgresEngagementRepository,
        PostgresStatsRepository,
    >,
    pub metrics_handle: PrometheusHandle,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config::AppConfig::from_env().context("failed to load configuration")?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let telemetry_guard = if config.telemetry_enabled {
        let telemetry_config = telemetry::TelemetryConfig::from(&config);
        Some(
            telemetry::init_telemetry_with_subscriber(&telemetry_config, env_filter)
                .context("failed to initialize telemetry")?,
        )
    } else {
        telemetry::init_subscriber_without_telemetry(env_filter);
        None
    };

    tracing::info!("starting the travel service");

    let metrics_handle = PrometheusBuilder::new()
        .install_recorder()
        .context("failed to install Prometheus recorder")?;
    metrics_process::Collector::default().describe();
    tracing::info!("prometheus metrics initialized");

    tracing::info!("config loaded, telemetry_enabled={}", config.telemetry_enabled);

    let pool = create_pool(&config.database_url, config.database_max_connections)
        .await
        .context("failed to create database pool")?;
    tracing::info!("database pool created");

    sqlx::migrate!().run(&pool).await?;
    tracing::info!("database migrations applied");

    let jwt_service = JwtService::new(config.jwt_secret.clone(), config.jwt_access_token_minutes);

    let shared_state = Arc::new(AppState {
        auth_usecase: AuthUseCase::new(PostgresUserRepository::new(pool.clone()), jwt_service.clone()),
        jwt_service,
        cities_usecase: CitiesUseCase::new(PostgresCityRepository::new(pool.clone())),
        activities_usecase: ActivitiesUseCase::new(PostgresActivityRepository::new(pool.clone())),
        amenities_usecase: AmenitiesUseCase::new(PostgresAmenityRepository::new(pool.clone())),
        preferences_usecase: PreferencesUseCase::new(PostgresPreferenceRepository::new(pool.clone())),
        destinations_usecase: DestinationsUseCase::new(
            PostgresDestinationRepository::new(pool.clone()),
            PostgresCityRepository::new(pool.clone()),
            PostgresReviewRepository::new(pool.clone()),
            PostgresEngagementRepository::new(pool.clone()),
        ),
        accommodations_usecase: AccommodationsUseCase::new(
            PostgresAccommodationRepository::new(pool.clone()),
            PostgresCityRepository::new(pool.clone()),
            PostgresReviewRepository::new(pool.clone()),
            PostgresBookingRepository::new(pool.clone()),
        ),
        reviews_usecase: ReviewsUseCase::new(PostgresReviewRepository::new(pool.clone())),
        engagement_usecase: EngagementUseCase::new(
            PostgresEngagementRepository::new(pool.clone()),
            PostgresDestinationRepository::new(pool.clone()),
            PostgresReviewRepository::new(pool.clone()),
        ),
        bookings_usecase: BookingsUseCase::new(PostgresBookingRepository::new(pool.clone())),
        home_usecase: HomeUseCase::new(
            PostgresDestinationRepository::new(pool.clone()),
            PostgresAccommodationRepository::new(pool.clone()),
            PostgresPreferenceRepository::new(pool.clone()),
            PostgresEngagementRepository::new(pool.clone()),
            PostgresStatsRepository::new(pool),
        ),
        metrics_handle,
    });

    let public_api = Router::new()
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/logout", post(auth::logout));

    let user_api = Router::new()
        .route("/api/v1/home", get(home::home))
        .route("/api/v1/search", get(home::search))
        .route(
            "/api/v1/profile",
            get(profile::get_profile).patch(profile::update_name),
        )
        .route("/api/v1/profile/email", put(profile::update_email))
        .route("/api/v1/profile/password", put(profile::change_password))
        .route("/api/v1/destinations", get(destinations::list_destinations))
        .route("/api/v1/destinations/{id}", get(destinations::get_destination))
        .route(
            "/api/v1/destinations/{id}/favorite",
            post(engagement::add_favorite).delete(engagement::remove_favorite),
        )
        .route("/api/v1/destinations/{id}/visit", post(engagement::mark_visited))
        .route("/api/v1/accommodations", get(accommodations::list_accommodations))
        .route("/api/v1/accommodations/{id}", get(accommodations::get_accommodation))
        .route("/api/v1/reviews", post(reviews::submit_review))
        .route("/api/v1/favorites", get(engagement::list_favorites))
        .route("/api/v1/travels", get(engagement::past_travels))
        .route(
            "/api/v1/bookings",
            get(bookings::list_bookings).post(bookings::make_booking),
        )
        .route("/api/v1/preferences", get(preferences::overview))
        .route(
            "/api/v1/preferences/{id}",
            post(preferences::add_to_user).delete(preferences::remove_from_user),
        );

    let admin_api = Router::new()
        .route(
            "/api/v1/admin/users",
            get(admin::list_users).post(admin::create_user),
        )
        .route("/api/v1/admin/users/{id}", delete(admin::delete_user))
        .route(
            "/api/v1/admin/cities",
            get(admin::list_cities).post(admin::create_city),
        )
        .route(
            "/api/v1/admin/cities/{id}",
            get(admin::get_city)
                .put(admin::update_city)
                .delete(admin::delete_city),
        )
        .route(
            "/api/v1/admin/activities",
            get(admin::list_activities).post(admin::create_activity),
        )
        .route(
            "/api/v1/admin/activities/{id}",
            get(admin::get_activity)
                .put(admin::update_activity)
                .delete(admin::delete_activity),
        )
        .route(
            "/api/v1/admin/amenities",
            get(admin::list_amenities).post(admin::create_amenity),
        )
        .route(
            "/api/v1/admin/amenities/{id}",
            put(admin::update_amenity).delete(admin::delete_amenity),
        )
        .route("/api/v1/admin/destinations", post(destinations::create_destination))
        .route(
            "/api/v1/admin/destinations/{id}",
            put(destinations::update_destination).delete(destinations::delete_destination),
        )
        .route(
            "/api/v1/admin/accommodations",
            post(accommodations::create_accommodation),
        )
        .route(
            "/api/v1/admin/accommodations/{id}",
            put(accommodations::update_accommodation)
                .delete(accommodations::delete_accommodation),
        )
        .route(
            "/api/v1/admin/reviews",
            get(reviews::list_reviews).post(reviews::create_review),
        )
        .route(
            "/api/v1/admin/reviews/{id}",
            get(reviews::get_review)
                .put(reviews::update_review)
                .delete(reviews::delete_review),
        )
        .route(
            "/api/v1/admin/preferences",
            get(preferences::list_preferences).post(preferences::create_preference),
        )
        .route(
            "/api/v1/admin/preferences/{id}",
            put(preferences::update_preference).delete(preferences::delete_preference),
        )
        .route("/api/v1/admin/bookings/archive", post(bookings::archive_expired));

    // Admin handlers check the role themselves; both groups need a session
    let protected_api = user_api
        .merge(admin_api)
        .layer(middleware::from_fn_with_state(
            shared_state.clone(),
            auth_middleware,
        ));

    let router = Router::new()
        .route("/healthz", get(healthz))
        .route("/metrics", get(metrics))
        .merge(public_api)
        .merge(protected_api)
        .layer(TraceLayer::new_for_http())
        .with_state(shared_state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    tracing::info!("travel service running on {}", config.listen_addr);
    axum::serve(listener, router).await?;

    if let Some(guard) = telemetry_guard {
        telemetry::shutdown_telemetry(guard);
    }

    Ok(())
}

async fn metrics(State(state): State<Arc<AppState>>) -> String {
    metrics_process::Collector::default().collect();
    state.metrics_handle.render()
}

#[tracing::instrument]
async fn healthz() -> &'static str {
    "OK"
}
