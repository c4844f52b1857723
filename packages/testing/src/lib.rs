mod helpers;
mod mock_cw20;
mod mock_dira;

pub use helpers::*;
pub use mock_cw20::*;
pub use mock_dira::*;
