pub mod memory;
pub mod multiblock_cache;
pub mod store;
pub mod worker;

pub use memory::{RecipeMemory, RECIPE_MEMORY_KEY};
pub use multiblock_cache::{
    CacheStatistics, MultiblockCache, MultiblockCacheEntry, MULTIBLOCK_CACHE_KEY,
};
pub use store::{InMemoryStore, JsonFileStore, KeyValueStore};
pub use worker::QueuedStore;
