// Adapters layer: concrete clients for the dataset API, the chat API and the output file.

pub mod chat;
pub mod dataset;
pub mod http;
pub mod json_store;

pub use chat::{ChatTranslator, StreamAccumulator};
pub use dataset::DatasetClient;
pub use json_store::JsonArrayStore;
