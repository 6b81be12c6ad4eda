// Domain layer: dataset descriptors, the built-in catalog and ports (interfaces).

pub mod catalog;
pub mod model;
pub mod ports;
