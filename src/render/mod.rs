pub mod bars;
pub mod frame;
