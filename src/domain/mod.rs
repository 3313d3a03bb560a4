// Domain layer: request models and ports (interfaces). No HTTP client types leak in here.

pub mod model;
pub mod ports;
