use crate::{
    decode::{is_hex, parse_hex},
    errors::ScriptError,
    opcodes::*,
    script::{push_data, push_int},
};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Mnemonic to opcode for every defined opcode from `OP_PUSHDATA1` on, under
/// both its canonical name and the name without the `OP_` prefix.
pub fn opcode_table() -> &'static HashMap<&'static str, u8> {
    static TABLE: OnceLock<HashMap<&'static str, u8>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = HashMap::new();
        for op in OP_PUSHDATA1..FIRST_UNDEFINED_OP_VALUE {
            let name = op_name(op);
            if name == OP_UNKNOWN_NAME {
                continue;
            }
            table.insert(name, op);
            table.insert(name.strip_prefix("OP_").unwrap_or(name), op);
        }
        table
    })
}

/// How a single word of script source is encoded.
#[derive(Debug, PartialEq, Eq)]
enum Token<'a> {
    Number(i64),
    Hex(&'a str),
    Quoted(&'a str),
    Opcode(u8),
    Unknown,
}

impl<'a> Token<'a> {
    fn classify(word: &'a str) -> Self {
        let digits = word.strip_prefix('-').unwrap_or(word);
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            return Token::Number(parse_i64_saturating(word));
        }
        if let Some(hex) = word.strip_prefix("0x").filter(|hex| !hex.is_empty()) {
            return Token::Hex(hex);
        }
        if word.len() >= 2 && word.starts_with('\'') && word.ends_with('\'') {
            return Token::Quoted(&word[1..word.len() - 1]);
        }
        match opcode_table().get(word) {
            Some(&op) => Token::Opcode(op),
            None => Token::Unknown,
        }
    }
}

fn parse_i64_saturating(word: &str) -> i64 {
    word.parse().unwrap_or(if word.starts_with('-') {
        i64::MIN
    } else {
        i64::MAX
    })
}

/// Push obligations carried from one word to the next.
#[derive(Default)]
struct PendingPush {
    expected: usize,
    field_width: usize,
}

impl PendingPush {
    /// Checks the bytes a word just appended and works out what the next word owes.
    fn update(&mut self, appended: &[u8], script: &str) -> Result<(), ScriptError> {
        let size_change = appended.len();

        if self.expected != 0 && size_change != self.expected {
            return Err(ScriptError::PushSizeMismatch {
                expected: self.expected,
                actual: size_change,
                script: script.to_string(),
            });
        }

        if self.expected != 0 && self.field_width != 0 {
            // The word was the length field of a PUSHDATA opcode
            self.expected = appended
                .iter()
                .rev()
                .fold(0, |len, &b| (len << 8) | b as usize);
            self.field_width = 0;
        } else if self.expected == 0 && size_change == 1 {
            let op = appended[0];
            self.expected = match op {
                OP_PUSHDATA1 => 1,
                OP_PUSHDATA2 => 2,
                OP_PUSHDATA4 => 4,
                _ if op < OP_PUSHDATA1 => op as usize,
                _ => 0,
            };
            if op >= OP_PUSHDATA1 {
                self.field_width = self.expected;
            }
        } else {
            self.expected = 0;
        }

        Ok(())
    }
}

/// Assembles whitespace-separated script source into bytecode.
///
/// Words are decimal numbers (minimal integer push), `0x` hex (raw bytes, no
/// push opcode), single-quoted strings (data push) or opcode names with or
/// without the `OP_` prefix. A push opcode must be followed by a word that
/// supplies exactly the number of bytes it declares.
pub fn assemble(text: &str) -> Result<Vec<u8>, ScriptError> {
    let mut script = vec![];
    let mut pending = PendingPush::default();

    for word in text.split([' ', '\t', '\n']).filter(|w| !w.is_empty()) {
        let start = script.len();

        match Token::classify(word) {
            Token::Number(n) => push_int(&mut script, n),
            Token::Hex(hex) => {
                if !is_hex(hex) {
                    return Err(ScriptError::MalformedHex {
                        token: word.to_string(),
                        script: text.to_string(),
                    });
                }
                script.extend_from_slice(&parse_hex(hex));
            }
            Token::Quoted(s) => push_data(&mut script, s.as_bytes()),
            Token::Opcode(op) => script.push(op),
            Token::Unknown => {
                return Err(ScriptError::UnknownToken {
                    token: word.to_string(),
                    script: text.to_string(),
                })
            }
        }

        pending.update(&script[start..], text)?;
    }

    Ok(script)
}
