pub mod extract;
pub mod mask;
pub mod normalize;
pub mod prepare;
