pub mod deal_breakers;
pub mod fit;
pub mod pipeline;
pub mod rubric;
pub mod weights;
pub mod workplace;
