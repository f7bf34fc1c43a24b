// Domain layer: schemas, records, hydration and the ports the rest of the crate plugs into.

pub mod hydrate;
pub mod model;
pub mod ports;
pub mod record;
pub mod schema;
