mod error;
mod math;
mod msg;
mod position;

pub use error::*;
pub use math::*;
pub use msg::*;
pub use position::*;
