pub mod depth;
pub mod lenient;
pub mod permalink;
