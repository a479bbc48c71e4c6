pub mod decode;
pub mod media;
pub mod store;
