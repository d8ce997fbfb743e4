pub mod container;
pub mod controller;
pub mod router;

pub use container::{Container, ContainerConfig, ProviderKind, DEFAULT_SYSTEM_PROMPT};
pub use controller::ChatOptions;
pub use router::Router;
