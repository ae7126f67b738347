// Domain layer: core models and ports (interfaces). No external dependencies
// beyond serde and the archive reader.

pub mod model;
pub mod ports;
