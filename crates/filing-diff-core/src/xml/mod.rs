pub mod arena;
pub mod builder;
pub mod namespaces;
pub mod node;
pub mod parser;
pub mod xname;

pub use arena::XmlDocument;
pub use builder::{serialize_html, HtmlOptions};
pub use node::XmlNodeData;
pub use parser::parse;
pub use xname::{XAttribute, XName};
