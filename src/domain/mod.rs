// Domain layer: request/response models and ports. No HTTP client code lives here.

pub mod model;
pub mod ports;
