pub mod ring;
pub mod vector;

pub use ring::RingBuffer;
pub use vector::Vector3;
