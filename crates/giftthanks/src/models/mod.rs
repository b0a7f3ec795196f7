mod payload;
mod query;

pub use payload::read_payload;
pub use query::DataQuery;
