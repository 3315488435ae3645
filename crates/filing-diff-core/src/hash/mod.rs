pub mod sha256;

pub use sha256::{content_hash_label, sha256_hash_string};
