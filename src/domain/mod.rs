// Domain layer: data shapes and ports. No I/O here.

pub mod model;
pub mod ports;
