//! Application layer - use cases, ports and display DTOs
//!
//! Services follow hexagonal architecture principles: they accept
//! repository/content dependencies through outbound ports and return
//! domain entities or DTOs. The resolution engine itself is pure and
//! lives under `services::resolution`.

pub mod dto;
pub mod ports;
pub mod services;
