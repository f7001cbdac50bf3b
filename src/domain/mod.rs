// Domain layer: run-scoped values and the ports each stage talks through.

pub mod model;
pub mod ports;
