use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::state::AppState;
use crate::domain::ports::{ActivityRepository, AuditRepository, BookingRepository, NotificationRepository, ScheduleRepository};
use crate::domain::services::{
    booking_service::BookingService,
    dispatch::{Dispatcher, Outbox},
    schedule_service::ScheduleService,
    session_service::SessionService,
};
use crate::infra::repositories::{
    postgres_activity_repo::PostgresActivityRepo, postgres_schedule_repo::PostgresScheduleRepo,
    postgres_booking_repo::PostgresBookingRepo, postgres_notification_repo::PostgresNotificationRepo,
    postgres_audit_repo::PostgresAuditRepo,
    sqlite_activity_repo::SqliteActivityRepo, sqlite_schedule_repo::SqliteScheduleRepo,
    sqlite_booking_repo::SqliteBookingRepo, sqlite_notification_repo::SqliteNotificationRepo,
    sqlite_audit_repo::SqliteAuditRepo,
};

/// The five ledger ports, already bound to one backend.
pub struct Repositories {
    pub activity_repo: Arc<dyn ActivityRepository>,
    pub schedule_repo: Arc<dyn ScheduleRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub notification_repo: Arc<dyn NotificationRepository>,
    pub audit_repo: Arc<dyn AuditRepository>,
}

impl Repositories {
    pub fn sqlite(pool: &SqlitePool) -> Self {
        Self {
            activity_repo: Arc::new(SqliteActivityRepo::new(pool.clone())),
            schedule_repo: Arc::new(SqliteScheduleRepo::new(pool.clone())),
            booking_repo: Arc::new(SqliteBookingRepo::new(pool.clone())),
            notification_repo: Arc::new(SqliteNotificationRepo::new(pool.clone())),
            audit_repo: Arc::new(SqliteAuditRepo::new(pool.clone())),
        }
    }

    pub fn postgres(pool: &PgPool) -> Self {
        Self {
            activity_repo: Arc::new(PostgresActivityRepo::new(pool.clone())),
            schedule_repo: Arc::new(PostgresScheduleRepo::new(pool.clone())),
            booking_repo: Arc::new(PostgresBookingRepo::new(pool.clone())),
            notification_repo: Arc::new(PostgresNotificationRepo::new(pool.clone())),
            audit_repo: Arc::new(PostgresAuditRepo::new(pool.clone())),
        }
    }
}

/// Wires services on top of `repos`. The returned outbox must be handed to the side-effect worker.
pub fn assemble_state(config: &Config, repos: Repositories) -> (AppState, Outbox) {
    let (dispatcher, outbox) = Dispatcher::channel();

    let schedule_service = Arc::new(ScheduleService::new(
        repos.activity_repo.clone(),
        repos.schedule_repo.clone(),
        repos.booking_repo.clone(),
        dispatcher.clone(),
    ));
    let booking_service = Arc::new(BookingService::new(
        repos.activity_repo.clone(),
        repos.schedule_repo.clone(),
        repos.booking_repo.clone(),
        dispatcher.clone(),
    ));

    let state = AppState {
        config: config.clone(),
        activity_repo: repos.activity_repo,
        schedule_repo: repos.schedule_repo,
        booking_repo: repos.booking_repo,
        notification_repo: repos.notification_repo,
        audit_repo: repos.audit_repo,
        session_service: Arc::new(SessionService::new(config)),
        schedule_service,
        booking_service,
        dispatcher,
    };
    (state, outbox)
}

pub async fn bootstrap_state(config: &Config) -> (AppState, Outbox) {
    let database_url = &config.database_url;

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        assemble_state(config, Repositories::postgres(&pool))
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        assemble_state(config, Repositories::sqlite(&pool))
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
