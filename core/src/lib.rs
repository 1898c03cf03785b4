pub mod index;
pub mod merge;
pub mod persist;
pub mod queries;
pub mod query;
pub mod report;
pub mod shared;
pub mod tokenizer;
pub mod trec;

pub type DocId = u32;

pub use index::{FrozenIndex, InvertedIndex};
pub use query::{BooleanRetrieval, PostingsSource, QueryError, Token};
pub use shared::SharedIndex;
