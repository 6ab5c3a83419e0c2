pub mod bindings;
pub mod display;
pub mod formula;
pub mod node;
pub mod placeholder;
pub mod substitution;
pub mod term;
