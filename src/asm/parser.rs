use crate::asm::lexer::{tokenize, Token, TokenKind};
use crate::class_file::{
    bytecode, Attribute, AttributeInfo, ClassFile, Constant, ConstantPool, Instruction, Method,
    Operand, OperandKind, Version,
};
use crate::{ClassAccessFlags, Error, MethodAccessFlags};

/// Parse assembly source into a [`ClassFile`]
///
/// The grammar is consumed strictly in order: versions, constants, access
/// flags, this/super class, then zero or more method blocks. Any token out
/// of place is fatal; there is no recovery or re-synchronization.
pub fn parse_assembly(source: &str) -> Result<ClassFile, Error> {
    let tokens = tokenize(source)?;
    Parser { tokens, pos: 0 }.parse_class()
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn parse_class(mut self) -> Result<ClassFile, Error> {
        self.expect(TokenKind::MajorVersion)?;
        let major_version = self.unsigned()? as u16;
        self.expect(TokenKind::MinorVersion)?;
        let minor_version = self.unsigned()? as u16;
        let constant_pool = self.parse_constants()?;
        let access_flags = self.parse_class_access_flags()?;
        self.expect(TokenKind::ThisClass)?;
        let this_class = self.unsigned()? as u16;
        self.expect(TokenKind::SuperClass)?;
        let super_class = self.unsigned()? as u16;

        // no interface, field, or class attribute sections exist in the
        // grammar; methods run to the end of the input
        let mut methods = Vec::new();
        while self.peek() == Some(&TokenKind::Method) {
            methods.push(self.parse_method(&constant_pool)?);
        }
        if self.pos != self.tokens.len() {
            return Err(self.unexpected());
        }

        Ok(ClassFile {
            version: Version {
                minor_version,
                major_version,
            },
            constant_pool,
            access_flags,
            this_class,
            super_class,
            interfaces: Vec::new(),
            methods,
            attributes: Vec::new(),
        })
    }

    fn parse_constants(&mut self) -> Result<ConstantPool, Error> {
        self.expect(TokenKind::Constants)?;
        self.expect(TokenKind::LBrace)?;
        let mut entries = Vec::new();
        loop {
            let token = self.next()?;
            let entry = match token.kind {
                TokenKind::RBrace => break,
                TokenKind::Class => Constant::Class {
                    name_index: self.unsigned()? as u16,
                },
                TokenKind::FieldRef => Constant::FieldRef {
                    class_index: self.unsigned()? as u16,
                    name_and_type_index: self.unsigned()? as u16,
                },
                TokenKind::MethodRef => Constant::MethodRef {
                    class_index: self.unsigned()? as u16,
                    name_and_type_index: self.unsigned()? as u16,
                },
                TokenKind::NameAndType => Constant::NameAndType {
                    name_index: self.unsigned()? as u16,
                    descriptor_index: self.unsigned()? as u16,
                },
                TokenKind::StringKw => Constant::String {
                    string_index: self.unsigned()? as u16,
                },
                TokenKind::Str(text) => Constant::Utf8(text.into_bytes()),
                kind => {
                    return Err(Error::UnexpectedToken {
                        token: kind.to_string(),
                        line: token.line,
                    })
                }
            };
            entries.push(entry);
        }
        Ok(ConstantPool::new(entries))
    }

    fn parse_class_access_flags(&mut self) -> Result<ClassAccessFlags, Error> {
        self.expect(TokenKind::AccessFlags)?;
        self.expect(TokenKind::LBrace)?;
        let mut flags = ClassAccessFlags::empty();
        loop {
            let token = self.next()?;
            flags |= match token.kind {
                TokenKind::RBrace => break,
                TokenKind::Public => ClassAccessFlags::PUBLIC,
                TokenKind::Final => ClassAccessFlags::FINAL,
                TokenKind::Super => ClassAccessFlags::SUPER,
                TokenKind::Interface => ClassAccessFlags::INTERFACE,
                TokenKind::Abstract => ClassAccessFlags::ABSTRACT,
                TokenKind::Synthetic => ClassAccessFlags::SYNTHETIC,
                TokenKind::Annotation => ClassAccessFlags::ANNOTATION,
                TokenKind::Enum => ClassAccessFlags::ENUM,
                TokenKind::Module => ClassAccessFlags::MODULE,
                kind => {
                    return Err(Error::UnexpectedToken {
                        token: kind.to_string(),
                        line: token.line,
                    })
                }
            };
        }
        Ok(flags)
    }

    fn parse_method_access_flags(&mut self) -> Result<MethodAccessFlags, Error> {
        self.expect(TokenKind::AccessFlags)?;
        self.expect(TokenKind::LBrace)?;
        let mut flags = MethodAccessFlags::empty();
        loop {
            let token = self.next()?;
            flags |= match token.kind {
                TokenKind::RBrace => break,
                TokenKind::Public => MethodAccessFlags::PUBLIC,
                TokenKind::Static => MethodAccessFlags::STATIC,
                kind => {
                    return Err(Error::UnexpectedToken {
                        token: kind.to_string(),
                        line: token.line,
                    })
                }
            };
        }
        Ok(flags)
    }

    fn parse_method(&mut self, pool: &ConstantPool) -> Result<Method, Error> {
        self.expect(TokenKind::Method)?;
        self.expect(TokenKind::LBrace)?;
        let access_flags = self.parse_method_access_flags()?;
        self.expect(TokenKind::NameIndex)?;
        let name_index = self.unsigned()? as u16;
        self.expect(TokenKind::TypeIndex)?;
        let descriptor_index = self.unsigned()? as u16;
        let code = self.parse_code(pool)?;
        self.expect(TokenKind::RBrace)?;
        Ok(Method {
            access_flags,
            name_index,
            descriptor_index,
            attributes: vec![code],
        })
    }

    fn parse_code(&mut self, pool: &ConstantPool) -> Result<Attribute, Error> {
        self.expect(TokenKind::Code)?;
        self.expect(TokenKind::LBrace)?;
        self.expect(TokenKind::MaxStack)?;
        let max_stack = self.unsigned()? as u16;
        self.expect(TokenKind::MaxLocal)?;
        let max_locals = self.unsigned()? as u16;
        self.expect(TokenKind::LBrace)?;
        let mut code = Vec::new();
        loop {
            let token = self.next()?;
            match token.kind {
                TokenKind::RBrace => break,
                TokenKind::Op(mnemonic) => {
                    let info =
                        bytecode::by_mnemonic(&mnemonic).ok_or_else(|| Error::UnexpectedToken {
                            token: format!(".{}", mnemonic),
                            line: token.line,
                        })?;
                    let operand = match info.operands {
                        OperandKind::None => Operand::None,
                        OperandKind::U8 => Operand::U8(self.unsigned()? as u8),
                        OperandKind::I8 => Operand::I8(self.signed()? as i8),
                        OperandKind::U16 => Operand::U16(self.unsigned()? as u16),
                        OperandKind::I16 => Operand::I16(self.signed()? as i16),
                        OperandKind::IndexDelta => Operand::IndexDelta {
                            index: self.unsigned()? as u8,
                            delta: self.signed()? as i8,
                        },
                    };
                    code.push(Instruction {
                        opcode: info.opcode,
                        operand,
                    });
                }
                kind => {
                    return Err(Error::UnexpectedToken {
                        token: kind.to_string(),
                        line: token.line,
                    })
                }
            }
        }
        self.expect(TokenKind::RBrace)?;

        let name_index = pool
            .utf8_index(b"Code")
            .ok_or(Error::MissingUtf8 { name: "Code" })?;
        Ok(Attribute {
            name_index,
            info: AttributeInfo::Code {
                max_stack,
                max_locals,
                code,
                attributes: Vec::new(),
            },
        })
    }

    fn peek(&self) -> Option<&TokenKind> {
        self.tokens.get(self.pos).map(|token| &token.kind)
    }

    fn next(&mut self) -> Result<Token, Error> {
        match self.tokens.get(self.pos) {
            Some(token) => {
                self.pos += 1;
                Ok(token.clone())
            }
            None => Err(self.end_of_input()),
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), Error> {
        let token = self.next()?;
        if token.kind != kind {
            return Err(Error::UnexpectedToken {
                token: token.kind.to_string(),
                line: token.line,
            });
        }
        Ok(())
    }

    fn unsigned(&mut self) -> Result<u32, Error> {
        let token = self.next()?;
        match token.kind {
            TokenKind::Number(value) => Ok(value),
            kind => Err(Error::UnexpectedToken {
                token: kind.to_string(),
                line: token.line,
            }),
        }
    }

    fn signed(&mut self) -> Result<i32, Error> {
        let mut token = self.next()?;
        let mut negate = false;
        if token.kind == TokenKind::Minus {
            negate = true;
            token = self.next()?;
        }
        match token.kind {
            TokenKind::Number(value) => {
                let value = value as i32;
                Ok(if negate { -value } else { value })
            }
            kind => Err(Error::UnexpectedToken {
                token: kind.to_string(),
                line: token.line,
            }),
        }
    }

    /// The parser ran off a token that should not be there
    fn unexpected(&self) -> Error {
        match self.tokens.get(self.pos) {
            Some(token) => Error::UnexpectedToken {
                token: token.kind.to_string(),
                line: token.line,
            },
            None => self.end_of_input(),
        }
    }

    fn end_of_input(&self) -> Error {
        Error::UnexpectedToken {
            token: "end of input".to_string(),
            line: self.tokens.last().map_or(1, |token| token.line),
        }
    }
}
