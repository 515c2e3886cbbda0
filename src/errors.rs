use std::fmt;
use std::io;

/// Errors raised while decoding a class file, encoding one back into bytes,
/// or parsing assembly source.
///
/// Every error is fatal to the operation that produced it: a structurally
/// invalid class file or a syntactically invalid source cannot be partially
/// trusted, so nothing is guessed, defaulted, or resumed.
#[derive(Debug)]
pub enum Error {
    /// The input did not start with the `0xCAFEBABE` magic number
    MalformedHeader { magic: u32 },

    /// A read ran past the end of the input buffer
    OutOfBounds {
        offset: usize,
        wanted: usize,
        len: usize,
    },

    /// A constant pool entry used a tag this codec does not model
    UnsupportedConstantTag { tag: u8 },

    /// An attribute name resolved to something this codec does not model
    UnsupportedAttribute { name: String },

    /// A stack map frame tag in the reserved 128-246 range, or an unknown
    /// verification type tag
    UnsupportedStackMapTag { tag: u8 },

    /// An opcode with no entry in the operand table
    UnsupportedOpcode { opcode: u8, offset: usize },

    /// A count or bit pattern the format allows but this codec does not model
    UnsupportedFeature { what: &'static str },

    /// A constant pool reference outside `1..constant_pool_count`
    BadConstantIndex { index: u16, count: u16 },

    /// A name lookup landed on a pool entry that is not `Utf8`
    NotUtf8 { index: u16 },

    /// An attribute's declared byte length disagrees with its actual payload
    AttributeLengthMismatch {
        name: &'static str,
        declared: u32,
        actual: u32,
    },

    /// The encode path needed a `Utf8` entry (e.g. `"Code"`) that the
    /// constant pool never declared
    MissingUtf8 { name: &'static str },

    /// Malformed literal in assembly source
    Lex { message: String, line: u32 },

    /// The assembly parser hit a token it did not expect
    UnexpectedToken { token: String, line: u32 },

    IoError(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MalformedHeader { magic } => {
                write!(f, "bad magic {:#010x}, expected 0xCAFEBABE", magic)
            }
            Error::OutOfBounds {
                offset,
                wanted,
                len,
            } => write!(
                f,
                "read of {} bytes at offset {} past the end of a {}-byte buffer",
                wanted, offset, len
            ),
            Error::UnsupportedConstantTag { tag } => {
                write!(f, "unsupported constant pool tag {}", tag)
            }
            Error::UnsupportedAttribute { name } => {
                write!(f, "unsupported attribute \"{}\"", name)
            }
            Error::UnsupportedStackMapTag { tag } => {
                write!(f, "unsupported stack map tag {}", tag)
            }
            Error::UnsupportedOpcode { opcode, offset } => {
                write!(f, "unsupported opcode {:#04x} at code offset {}", opcode, offset)
            }
            Error::UnsupportedFeature { what } => write!(f, "{} are not supported", what),
            Error::BadConstantIndex { index, count } => write!(
                f,
                "constant pool index {} out of range (pool count is {})",
                index, count
            ),
            Error::NotUtf8 { index } => {
                write!(f, "constant pool entry {} is not a Utf8 entry", index)
            }
            Error::AttributeLengthMismatch {
                name,
                declared,
                actual,
            } => write!(
                f,
                "{} attribute declares {} payload bytes but holds {}",
                name, declared, actual
            ),
            Error::MissingUtf8 { name } => {
                write!(f, "no Utf8 constant \"{}\" in the constant pool", name)
            }
            Error::Lex { message, line } => write!(f, "{} (ln. {})", message, line),
            Error::UnexpectedToken { token, line } => {
                write!(f, "unexpected token \"{}\" (ln. {})", token, line)
            }
            Error::IoError(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(err) => Some(err),
            _ => None,
        }
    }
}
