pub mod aggregator;
pub mod calibration;
pub mod catalog;
pub mod ranking;
pub mod recommendations;
pub mod scorer;
pub mod signals;
pub mod user_list;

pub use recommendations::Recommender;
