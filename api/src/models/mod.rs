pub mod daily_nutrients;
pub mod food_entries;
pub mod users;
