pub mod memory;
pub mod traits;

pub use memory::InMemoryLogStore;
pub use traits::{CheckoutPatch, LogStore};
