pub mod artisans;
pub mod comments;
pub mod export;
