mod dto;
mod services;
pub mod validation;

pub use dto::{CreatedMeal, Meal, NewMeal};
pub use services::{create_meal, get_meals};
