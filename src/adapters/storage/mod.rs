//! Search backend adapters

pub mod elastic;

pub use elastic::ElasticClient;
