// Store module - cart state owner

pub mod cart_store;

pub use cart_store::CartStore;
