pub mod assembler;
pub mod core;
pub mod decode;
pub mod errors;
pub mod num;
pub mod opcodes;
pub mod script;

pub use assembler::assemble;
pub use decode::{
    decode_hex_block, decode_hex_tx, is_hex, parse_hash_str, parse_hash_value, parse_hex,
    parse_hex_value,
};
pub use errors::{DecodeError, ScriptError};
