use clap::{Parser, Subcommand};
use script_asm::{
    assemble,
    core::{Block, Tx},
    decode_hex_block, decode_hex_tx,
};
use serde_json::{json, Value};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

/// Bitcoin script assembler
///
/// Turns script source such as `DUP HASH160 0x14 0x89ab.. EQUALVERIFY CHECKSIG`
/// into hex bytecode, and decodes hex transactions and blocks into JSON.
#[derive(Parser, Debug)]
#[command(name = "script-asm")]
#[command(about = "Bitcoin script assembler", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Assemble script source into hex bytecode
    Asm {
        /// Script source (reads stdin when neither this nor --file is given)
        script: Option<String>,

        /// Read script source from a file
        #[arg(short, long, conflicts_with = "script")]
        file: Option<PathBuf>,
    },
    /// Decode a hex-serialized transaction
    Tx {
        hex: String,
    },
    /// Decode a hex-serialized block
    Block {
        hex: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    match args.command {
        Command::Asm { script, file } => {
            let source = match (script, file) {
                (Some(script), _) => script,
                (None, Some(path)) => fs::read_to_string(path)?,
                (None, None) => {
                    let mut source = String::new();
                    io::stdin().read_to_string(&mut source)?;
                    source
                }
            };
            match assemble(&source) {
                Ok(bytes) => println!("{}", hex::encode(bytes)),
                Err(err) => {
                    eprintln!("Assembly error: {}", err);
                    return Err(err.into());
                }
            }
        }
        Command::Tx { hex } => {
            let tx = decode_hex_tx(hex.trim()).ok_or("TX decode failed")?;
            println!("{}", serde_json::to_string_pretty(&tx_json(&tx))?);
        }
        Command::Block { hex } => {
            let block = decode_hex_block(hex.trim()).ok_or("Block decode failed")?;
            println!("{}", serde_json::to_string_pretty(&block_json(&block))?);
        }
    }

    Ok(())
}

fn tx_json(tx: &Tx) -> Value {
    let mut value = json!(tx);
    value["txid"] = json!(tx.id());
    value
}

fn block_json(block: &Block) -> Value {
    let mut value = json!(block.header);
    value["hash"] = json!(block.hash());
    value["tx"] = block.txs.iter().map(|tx| json!(tx.id())).collect();
    value
}
