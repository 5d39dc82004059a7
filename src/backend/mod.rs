mod backend;
mod device;
mod local;

pub use backend::Backend;
pub use device::Device;
pub use local::LocalBackend;
