// Sources module - data access boundary

pub mod cart_source;
pub mod memory;

pub use cart_source::CartSource;
pub use memory::InMemoryCartSource;
