pub mod image_ctx;
pub mod image_flow;

pub use image_ctx::ImageCtx;
pub use image_flow::{FlowResult, ImageFlow};
