use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, warn};
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::{Connection, Error};

use super::RateStore;
use crate::config::DatabaseConfig;
use crate::error::StoreError;
use crate::rate::Rate;

/// `rates` table accessed over a single owned MySQL connection.
pub struct MySqlRateStore {
    conn: Option<MySqlConnection>,
}

impl MySqlRateStore {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let conn = MySqlConnection::connect_with(&connect_options(config)).await?;
        debug!(
            "Connected to {} on {}:{}",
            config.name, config.host, config.port
        );

        Ok(Self { conn: Some(conn) })
    }

    fn conn(&mut self) -> Result<&mut MySqlConnection, StoreError> {
        self.conn
            .as_mut()
            .ok_or(StoreError::Database(Error::PoolClosed))
    }
}

fn connect_options(config: &DatabaseConfig) -> MySqlConnectOptions {
    let mut options = MySqlConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .database(&config.name)
        .charset("utf8")
        .pipes_as_concat(true);

    if let Some(user) = &config.user {
        options = options.username(user);
    }
    if let Some(password) = &config.password {
        options = options.password(password);
    }

    options
}

#[async_trait]
impl RateStore for MySqlRateStore {
    async fn max_date(&mut self) -> Result<Option<NaiveDate>, StoreError> {
        let date = sqlx::query_scalar::<_, Option<NaiveDate>>("SELECT MAX(`date`) FROM rates")
            .fetch_one(self.conn()?)
            .await?;

        Ok(date)
    }

    async fn insert_rate(&mut self, rate: &Rate) -> Result<(), StoreError> {
        let mut tx = self.conn()?.begin().await?;

        let result = sqlx::query("INSERT INTO rates (`date`, currency, to_base) VALUES (?, ?, ?)")
            .bind(rate.date)
            .bind(&rate.currency)
            .bind(rate.to_base)
            .execute(&mut *tx)
            .await;

        match result {
            Ok(_) => {
                tx.commit().await?;
                Ok(())
            }
            // dropping `tx` rolls the attempt back
            Err(Error::Database(e)) if e.is_unique_violation() => Err(StoreError::DuplicateRow {
                date: rate.date,
                currency: rate.currency.clone(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    async fn close(&mut self) {
        if let Some(conn) = self.conn.take() {
            match conn.close().await {
                Ok(()) => debug!("Database connection closed"),
                Err(e) => warn!("Failed to close database connection cleanly: {e}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn database_config() -> DatabaseConfig {
        DatabaseConfig {
            name: "fx".to_string(),
            host: "db.internal".to_string(),
            port: 3336,
            user: Some("fx".to_string()),
            password: None,
        }
    }

    #[test]
    fn test_connect_options() {
        let options = connect_options(&database_config());

        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 3336);
        assert_eq!(options.get_database(), Some("fx"));
        assert_eq!(options.get_username(), "fx");
        assert_eq!(options.get_charset(), "utf8");
    }

    #[tokio::test]
    async fn test_closed_store_rejects_queries() {
        let mut store = MySqlRateStore { conn: None };
        store.close().await;

        let err = store.max_date().await.unwrap_err();

        assert!(matches!(err, StoreError::Database(Error::PoolClosed)));
    }
}
