pub mod export;
pub mod quote;
pub mod reflections;
pub mod reminder;
pub mod tags;
