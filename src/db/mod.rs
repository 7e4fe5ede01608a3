pub mod memory;
pub mod postgres;
pub mod redis;
pub mod store;

pub use memory::InMemoryWatchStore;
pub use postgres::{create_pool, run_migrations, PgWatchStore};
pub use self::redis::{create_redis_client, Cache, CacheKey, CacheWriterHandle};
pub use store::WatchStore;
