pub mod accessor;
pub mod gltf_loader;
pub mod image_loader;

pub use gltf_loader::load_model;
pub use image_loader::{ load_rgba8, ImageData };
