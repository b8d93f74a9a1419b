pub mod tags;
pub mod time;
pub mod validation;
