pub mod client;

pub use client::{ListingParams, RedditClient, RedditError};
