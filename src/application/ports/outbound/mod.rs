//! Outbound ports - Interfaces that the application requires from external systems

mod content_port;
mod repository_port;

pub use content_port::FactionDataPort;
pub use repository_port::ArmyListRepositoryPort;
