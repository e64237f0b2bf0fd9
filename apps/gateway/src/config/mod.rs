pub mod app;
pub mod backends;

pub use app::{Config, RuntimeEnv};
pub use backends::{Backend, BackendId, Backends};
