pub mod customer_feedback;
pub mod health_screening;

pub use customer_feedback::{HAPPY_RATING, customer_feedback};
pub use health_screening::{HEALTH_SCREENING_JSON, health_screening};
