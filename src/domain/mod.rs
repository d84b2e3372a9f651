// Domain layer: the line value type and the capability traits the dispatch core is written against.

pub mod model;
pub mod ports;
