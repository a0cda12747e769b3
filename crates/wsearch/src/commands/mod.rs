pub mod grep;
pub mod query;
pub mod serve;
pub mod workspace;
