mod collect;
mod parse;
mod query;
mod ticket;

pub use collect::{GraphRequest, load_graph};
pub use query::{SubgraphQuery, file_dependencies};
pub use ticket::{LoadTicket, LoadTracker};
