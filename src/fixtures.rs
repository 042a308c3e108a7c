#[cfg(test)]
pub mod test {
    use std::time::Duration;

    use serde::{Deserialize, Serialize};

    use crate::env::MapEnv;
    use crate::schema::{Configure, Fields};

    #[derive(Serialize, Deserialize, Debug, Default, PartialEq)]
    #[serde(default)]
    pub struct AppConfig {
        pub host: String,
        pub port: u16,
        pub debug: bool,
        pub tags: Vec<String>,
        pub database: DbConfig,
    }

    impl Configure for AppConfig {
        fn fields<'a>(&'a mut self, f: &mut Fields<'a>) {
            f.field("host", &mut self.host)
                .env("HOST")
                .default("localhost")
                .description("Address to bind to");
            f.field("port", &mut self.port)
                .env("PORT,APP_PORT")
                .default("8080")
                .description("Port to listen on");
            f.field("debug", &mut self.debug).env("DEBUG").updatable();
            f.field("tags", &mut self.tags).env("TAGS");
            f.group("database", &mut self.database).prefix("DB_");
        }
    }

    #[derive(Serialize, Deserialize, Debug, Default, PartialEq)]
    #[serde(default)]
    pub struct DbConfig {
        pub url: String,
        pub pool_size: usize,
    }

    impl Configure for DbConfig {
        fn fields<'a>(&'a mut self, f: &mut Fields<'a>) {
            f.field("url", &mut self.url)
                .env("URL")
                .required()
                .description("Connection string");
            f.field("pool_size", &mut self.pool_size)
                .env("POOL_SIZE")
                .default("5")
                .updatable();
        }
    }

    /// Environment satisfying every required field of [`AppConfig`].
    pub fn app_env() -> MapEnv {
        MapEnv::from_iter([("DB_URL", "postgres://localhost/app")])
    }

    // -- Three levels of nesting ------------------------------------------------

    #[derive(Debug, Default, PartialEq)]
    pub struct ServiceConfig {
        pub name: String,
        pub cache: CacheConfig,
    }

    impl Configure for ServiceConfig {
        fn fields<'a>(&'a mut self, f: &mut Fields<'a>) {
            f.field("name", &mut self.name).env("NAME");
            f.group("cache", &mut self.cache).prefix("APP_CACHE_");
        }
    }

    #[derive(Debug, Default, PartialEq)]
    pub struct CacheConfig {
        pub ttl: Duration,
        pub redis: RedisConfig,
    }

    impl Configure for CacheConfig {
        fn fields<'a>(&'a mut self, f: &mut Fields<'a>) {
            f.field("ttl", &mut self.ttl).env("TTL").default("30s");
            f.group("redis", &mut self.redis).prefix("REDIS_");
        }
    }

    #[derive(Debug, Default, PartialEq)]
    pub struct RedisConfig {
        pub host: String,
    }

    impl Configure for RedisConfig {
        fn fields<'a>(&'a mut self, f: &mut Fields<'a>) {
            f.field("host", &mut self.host).env("HOST");
        }
    }
}
