pub mod comments;
pub mod query;
