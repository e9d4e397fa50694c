mod change_sink;
mod graph_store;

pub use change_sink::IChangeSink;
pub use graph_store::{IGraphReader, IGraphStore};
