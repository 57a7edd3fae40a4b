pub mod quote;
pub mod reflection;
pub mod tag;

pub use quote::Quote;
pub use reflection::{NewReflection, Reflection, ReflectionRow};
pub use tag::Tag;
