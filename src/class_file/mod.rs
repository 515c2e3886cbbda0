mod attribute;
pub mod bytecode;
mod class;
mod constants;
mod frame;
mod method;
mod serialize;
mod version;

pub use attribute::*;
pub use bytecode::{Instruction, OpInfo, Operand, OperandKind};
pub use class::*;
pub use constants::*;
pub use frame::*;
pub use method::*;
pub use serialize::*;
pub use version::*;
