pub mod market;
pub mod price;
pub mod sentiment;

pub use market::*;
pub use price::*;
pub use sentiment::*;
