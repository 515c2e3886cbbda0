use crate::Error;
use std::fmt;

/// One token of assembly source, tagged with the line it started on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    LBrace,
    RBrace,
    Minus,

    /// Decimal or `x`-prefixed hexadecimal literal
    Number(u32),

    /// Double-quoted literal, quotes stripped
    Str(String),

    /// `.`-prefixed opcode mnemonic, dot stripped
    Op(String),

    // Section keywords.
    AccessFlags,
    Class,
    Code,
    Constants,
    FieldRef,
    MajorVersion,
    MaxLocal,
    MaxStack,
    Method,
    MethodRef,
    MinorVersion,
    NameAndType,
    NameIndex,
    StringKw,
    SuperClass,
    ThisClass,
    TypeIndex,

    // Access flag names.
    Public,
    Static,
    Super,
    Final,
    Interface,
    Abstract,
    Synthetic,
    Annotation,
    Enum,
    Module,

    /// Anything else; always rejected by the parser
    Unknown(String),
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::LBrace => f.write_str("{"),
            TokenKind::RBrace => f.write_str("}"),
            TokenKind::Minus => f.write_str("-"),
            TokenKind::Number(value) => write!(f, "{}", value),
            TokenKind::Str(text) => write!(f, "\"{}\"", text),
            TokenKind::Op(mnemonic) => write!(f, ".{}", mnemonic),
            TokenKind::AccessFlags => f.write_str("access_flags"),
            TokenKind::Class => f.write_str("class"),
            TokenKind::Code => f.write_str("code"),
            TokenKind::Constants => f.write_str("constants"),
            TokenKind::FieldRef => f.write_str("field_ref"),
            TokenKind::MajorVersion => f.write_str("major_version"),
            TokenKind::MaxLocal => f.write_str("max_local"),
            TokenKind::MaxStack => f.write_str("max_stack"),
            TokenKind::Method => f.write_str("method"),
            TokenKind::MethodRef => f.write_str("method_ref"),
            TokenKind::MinorVersion => f.write_str("minor_version"),
            TokenKind::NameAndType => f.write_str("name_and_type"),
            TokenKind::NameIndex => f.write_str("name_index"),
            TokenKind::StringKw => f.write_str("string"),
            TokenKind::SuperClass => f.write_str("super_class"),
            TokenKind::ThisClass => f.write_str("this_class"),
            TokenKind::TypeIndex => f.write_str("type_index"),
            TokenKind::Public => f.write_str("PUBLIC"),
            TokenKind::Static => f.write_str("STATIC"),
            TokenKind::Super => f.write_str("SUPER"),
            TokenKind::Final => f.write_str("FINAL"),
            TokenKind::Interface => f.write_str("INTERFACE"),
            TokenKind::Abstract => f.write_str("ABSTRACT"),
            TokenKind::Synthetic => f.write_str("SYNTHETIC"),
            TokenKind::Annotation => f.write_str("ANNOTATION"),
            TokenKind::Enum => f.write_str("ENUM"),
            TokenKind::Module => f.write_str("MODULE"),
            TokenKind::Unknown(text) => f.write_str(text),
        }
    }
}

/// Tokenize a whole source file
///
/// Space and tab separate tokens and are discarded, `;` starts a comment
/// running to the end of the line, and newlines advance the line counter -
/// including newlines inside quoted literals.
pub fn tokenize(source: &str) -> Result<Vec<Token>, Error> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut line: u32 = 1;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b' ' | b'\t' | b'\r' => i += 1,
            b'\n' => {
                line += 1;
                i += 1;
            }
            b';' => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'-' => {
                tokens.push(Token {
                    kind: TokenKind::Minus,
                    line,
                });
                i += 1;
            }
            b'{' => {
                tokens.push(Token {
                    kind: TokenKind::LBrace,
                    line,
                });
                i += 1;
            }
            b'}' => {
                tokens.push(Token {
                    kind: TokenKind::RBrace,
                    line,
                });
                i += 1;
            }
            b'"' => {
                let start_line = line;
                let start = i + 1;
                let mut j = start;
                while j < bytes.len() && bytes[j] != b'"' {
                    if bytes[j] == b'\n' {
                        line += 1;
                    }
                    j += 1;
                }
                if j == bytes.len() {
                    return Err(Error::Lex {
                        message: "unterminated string literal".to_string(),
                        line: start_line,
                    });
                }
                tokens.push(Token {
                    kind: TokenKind::Str(source[start..j].to_string()),
                    line: start_line,
                });
                i = j + 1;
            }
            _ => {
                let start = i;
                let mut j = i;
                while j < bytes.len()
                    && !matches!(bytes[j], b' ' | b'\t' | b'\r' | b'\n' | b';' | b'{' | b'}')
                {
                    j += 1;
                }
                let word = &source[start..j];
                tokens.push(Token {
                    kind: classify(word, line)?,
                    line,
                });
                i = j;
            }
        }
    }
    Ok(tokens)
}

fn classify(word: &str, line: u32) -> Result<TokenKind, Error> {
    let bytes = word.as_bytes();
    if bytes[0].is_ascii_digit() {
        // hexadecimal whenever the second character is `x`
        let value = if bytes.len() > 1 && bytes[1] == b'x' {
            if bytes.len() == 2 {
                return Err(Error::Lex {
                    message: "hex literal has no digits".to_string(),
                    line,
                });
            }
            u32::from_str_radix(&word[2..], 16)
        } else {
            word.parse::<u32>()
        };
        return match value {
            Ok(value) => Ok(TokenKind::Number(value)),
            Err(_) => Err(Error::Lex {
                message: format!("unable to parse number \"{}\"", word),
                line,
            }),
        };
    }
    if let Some(mnemonic) = word.strip_prefix('.') {
        return Ok(TokenKind::Op(mnemonic.to_string()));
    }
    let kind = match word {
        "access_flags" => TokenKind::AccessFlags,
        "class" => TokenKind::Class,
        "code" => TokenKind::Code,
        "constants" => TokenKind::Constants,
        "field_ref" => TokenKind::FieldRef,
        "major_version" => TokenKind::MajorVersion,
        "max_local" => TokenKind::MaxLocal,
        "max_stack" => TokenKind::MaxStack,
        "method" => TokenKind::Method,
        "method_ref" => TokenKind::MethodRef,
        "minor_version" => TokenKind::MinorVersion,
        "name_and_type" => TokenKind::NameAndType,
        "name_index" => TokenKind::NameIndex,
        "string" => TokenKind::StringKw,
        "super_class" => TokenKind::SuperClass,
        "this_class" => TokenKind::ThisClass,
        "type_index" => TokenKind::TypeIndex,
        "PUBLIC" => TokenKind::Public,
        "STATIC" => TokenKind::Static,
        "SUPER" => TokenKind::Super,
        "FINAL" => TokenKind::Final,
        "INTERFACE" => TokenKind::Interface,
        "ABSTRACT" => TokenKind::Abstract,
        "SYNTHETIC" => TokenKind::Synthetic,
        "ANNOTATION" => TokenKind::Annotation,
        "ENUM" => TokenKind::Enum,
        "MODULE" => TokenKind::Module,
        other => TokenKind::Unknown(other.to_string()),
    };
    Ok(kind)
}
