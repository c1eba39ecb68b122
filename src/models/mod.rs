pub mod category;
pub mod descriptor;

pub use category::ImageCategory;
pub use descriptor::ImageDescriptor;
