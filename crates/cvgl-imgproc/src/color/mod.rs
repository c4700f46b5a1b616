mod gray;
mod yuv;

pub use gray::gray_from_rgb_u8;
pub use yuv::gray_from_frame;
