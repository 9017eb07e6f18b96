pub mod basis;
pub mod synth;
