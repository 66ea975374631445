pub mod aggregator;
pub mod dashboard;
pub mod excel;
pub mod normalizer;
pub mod renderer;
