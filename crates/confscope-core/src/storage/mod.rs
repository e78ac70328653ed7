pub mod json_store;

pub use json_store::{load_authors, load_papers, read_json, save_authors, save_papers, write_json};
