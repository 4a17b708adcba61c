/// Postgres connection details and batching knobs, assembled from the
/// environment the way the rest of this stack reads its tunables.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
    pub dbname: Option<String>,
    pub batch_size: usize,
    pub pool_size: u32,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("TONDB_PG_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: std::env::var("TONDB_PG_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5432),
            user: std::env::var("TONDB_PG_USER").ok(),
            password: std::env::var("TONDB_PG_PASSWORD").ok(),
            dbname: std::env::var("TONDB_PG_DBNAME").ok(),
            batch_size: std::env::var("TONDB_BATCH_SIZE")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .unwrap_or(100),
            pool_size: std::env::var("TONDB_POOL_SIZE")
                .unwrap_or_else(|_| "50".to_string())
                .parse()
                .unwrap_or(50),
        }
    }

    /// Composes `hostaddr`/`port`/`user`/`password`/`dbname` into a libpq
    /// connection string. A `host` already holding a full `postgres://` URL
    /// (as `TONDB_TEST_DATABASE_URL` typically does) is passed through
    /// verbatim — Diesel's `PgConnection::establish` accepts either form.
    pub fn connection_string(&self) -> String {
        if self.host.contains("://") {
            return self.host.clone();
        }
        let mut s = format!("hostaddr={} port={}", self.host, self.port);
        if let Some(user) = &self.user {
            s.push_str(&format!(" user={user}"));
        }
        if let Some(password) = &self.password {
            s.push_str(&format!(" password={password}"));
        }
        if let Some(dbname) = &self.dbname {
            s.push_str(&format!(" dbname={dbname}"));
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_string_includes_only_set_fields() {
        let cfg = Config {
            host: "db.internal".to_string(),
            port: 5432,
            user: Some("scanner".to_string()),
            password: None,
            dbname: Some("ton_index".to_string()),
            batch_size: 100,
            pool_size: 50,
        };
        assert_eq!(
            cfg.connection_string(),
            "hostaddr=db.internal port=5432 user=scanner dbname=ton_index"
        );
    }
}
