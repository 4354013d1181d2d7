pub mod config;
pub mod ingest;
pub mod live;
pub mod replay;
pub mod report;
pub mod runner;
