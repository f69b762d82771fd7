pub mod interpreter;

pub use interpreter::interpret_parking;
