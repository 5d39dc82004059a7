mod error;
mod tensor;

pub use error::SizeMismatchErr;
pub use tensor::{Tensor, copy_from_to};
