pub mod entries;
pub mod pool;

pub use entries::EntryRepository;
pub use pool::create_pool;
