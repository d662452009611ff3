pub mod cursor;
pub mod errors;
pub mod export;
pub mod ids;
pub mod models;
pub mod storage;
pub mod store;
pub mod validation;

pub use cursor::*;
pub use errors::*;
pub use models::*;
pub use storage::memory::MemoryStorage;
pub use storage::*;
pub use store::*;
pub use validation::*;
