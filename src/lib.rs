//! Assemble and disassemble JVM class files
//!
//! The decode direction turns raw class file bytes into a structured
//! [`class_file::ClassFile`]; the encode direction turns a textual class
//! description into the same structure and serializes it back to bytes,
//! bit-exact where the input was well formed.
//!
//! ### Simple example
//!
//! ```
//! use jasm::asm;
//! use jasm::class_file::ClassFile;
//!
//! # fn assemble() -> Result<(), jasm::Error> {
//! let class = asm::parse_assembly(
//!     "major_version 58 \
//!      minor_version 0 \
//!      constants { class 1 } \
//!      access_flags { SUPER } \
//!      this_class 1 \
//!      super_class 0",
//! )?;
//! let bytes = class.encode()?;
//!
//! // a decode of the emitted bytes reproduces the same structure
//! assert_eq!(ClassFile::parse(&bytes)?, class);
//! # Ok(())
//! # }
//! # assemble().unwrap();
//! ```

pub mod asm;
pub mod class_file;

mod access_flags;
mod cursor;
mod errors;

pub use access_flags::*;
pub use cursor::*;
pub use errors::*;
