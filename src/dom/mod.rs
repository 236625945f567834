pub mod builder;
pub mod element;
pub mod events;

pub use builder::ElementBuilder;
pub use element::*;
