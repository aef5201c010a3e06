use clap::Parser;
use clap::ValueEnum;
use revconnect_core::ContentLimits;
use sqlx::postgres::PgConnectOptions;

#[derive(Clone, Parser, Debug, Default)]
#[command(name = "revconnect-api")]
#[command(about = "RevConnect API Server", long_about = None)]
pub struct Config {
    #[command(flatten)]
    pub database: DatabaseConfig,

    #[command(flatten)]
    pub jwt: JwtConfig,

    #[command(flatten)]
    pub server: ServerConfig,

    #[command(flatten)]
    pub limits: LimitsConfig,

    #[arg(
        long = "environment",
        env = "ENVIRONMENT",
        default_value = "development"
    )]
    pub environment: Environment,
}

#[derive(Clone, Parser, Debug, Default)]
pub struct DatabaseConfig {
    #[arg(
        long = "database-host",
        env = "DATABASE_HOST",
        default_value = "localhost"
    )]
    pub host: String,

    #[arg(long = "database-port", env = "DATABASE_PORT", default_value = "5432")]
    pub port: u16,

    #[arg(
        long = "database-user",
        env = "DATABASE_USER",
        default_value = "postgres"
    )]
    pub user: String,

    #[arg(
        long = "database-password",
        env = "DATABASE_PASSWORD",
        value_name = "database_password"
    )]
    pub password: String,

    #[arg(
        long = "database-name",
        env = "DATABASE_NAME",
        default_value = "revconnect",
        value_name = "database_name"
    )]
    pub db_name: String,
}

impl From<DatabaseConfig> for PgConnectOptions {
    fn from(config: DatabaseConfig) -> Self {
        PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.db_name)
    }
}

#[derive(Clone, Parser, Debug, Default)]
pub struct JwtConfig {
    #[arg(
        long = "jwt-secret-key",
        env = "JWT_SECRET_KEY",
        name = "jwt_secret_key"
    )]
    pub secret_key: String,

    /// Lifetime of issued access tokens
    #[arg(long = "jwt-ttl-seconds", env = "JWT_TTL_SECONDS", default_value = "3600")]
    pub ttl_seconds: i64,
}

#[derive(Clone, Parser, Debug, Default)]
pub struct ServerConfig {
    #[arg(
        long = "server-api-port",
        env = "API_PORT",
        default_value = "8080",
        name = "api_port"
    )]
    pub api_port: u16,

    #[arg(
        long = "server-health-port",
        env = "HEALTH_PORT",
        default_value = "8081"
    )]
    pub health_port: u16,
}

#[derive(Clone, Parser, Debug)]
pub struct LimitsConfig {
    #[arg(long = "max-post-length", env = "MAX_POST_LENGTH", default_value = "5000")]
    pub max_post_length: usize,

    #[arg(
        long = "max-comment-length",
        env = "MAX_COMMENT_LENGTH",
        default_value = "1000"
    )]
    pub max_comment_length: usize,

    #[arg(
        long = "max-message-length",
        env = "MAX_MESSAGE_LENGTH",
        default_value = "1000"
    )]
    pub max_message_length: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        let limits = ContentLimits::default();
        Self {
            max_post_length: limits.max_post_length,
            max_comment_length: limits.max_comment_length,
            max_message_length: limits.max_message_length,
        }
    }
}

impl From<LimitsConfig> for ContentLimits {
    fn from(config: LimitsConfig) -> Self {
        ContentLimits {
            max_post_length: config.max_post_length,
            max_comment_length: config.max_comment_length,
            max_message_length: config.max_message_length,
        }
    }
}

#[derive(Clone, Debug, ValueEnum, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
    Test,
}
