pub mod entry;
pub mod recommendation;
pub mod user;
pub mod weights;

pub use entry::Entry;
pub use recommendation::{
    RecommendationRequest, RecommendationResponse, RecommendedSeries, Recommendations,
};
pub use user::User;
pub use weights::SignalWeights;
