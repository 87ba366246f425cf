pub mod components;
pub mod thermodynamics;
