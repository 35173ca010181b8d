use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::{MySql, Pool};
use std::time::Duration;

use super::environment::{DatabaseConfig, DatabaseConnection};

pub type DbPool = Pool<MySql>;

pub async fn init_db(config: &DatabaseConfig) -> Result<DbPool, sqlx::Error> {
    let options = match &config.connection {
        DatabaseConnection::Url(url) => url.parse::<MySqlConnectOptions>()?,
        DatabaseConnection::Parts {
            host,
            port,
            user,
            password,
            name,
        } => MySqlConnectOptions::new()
            .host(host)
            .port(*port)
            .username(user)
            .password(password)
            .database(name),
    };

    MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .max_lifetime(config.max_lifetime)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(options)
        .await
}
