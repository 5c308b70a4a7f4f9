use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::io::{self, Read, Write};

pub const HASH_LEN: usize = 32;
pub const HEADER_LEN: usize = 80;

pub const TX_VERSION: i32 = 1;
pub const SEQUENCE_FINAL: u32 = 0xffffffff;

/// A double-SHA256 style hash, stored in internal byte order and shown reversed.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Hash256(pub [u8; HASH_LEN]);

impl Hash256 {
    /// Loads a hash from its displayed hex form. Only the last 64 digits count
    /// and missing high digits are zero.
    pub fn from_hex(s: &str) -> Self {
        let digits: Vec<u8> = s
            .bytes()
            .map_while(|b| (b as char).to_digit(16).map(|d| d as u8))
            .collect();
        let mut hash = [0; HASH_LEN];
        for (i, pair) in digits.rchunks(2).take(HASH_LEN).enumerate() {
            hash[i] = match pair {
                [hi, lo] => hi << 4 | lo,
                [lo] => *lo,
                _ => 0,
            };
        }
        Hash256(hash)
    }

    pub fn to_hex(&self) -> String {
        let mut bytes = self.0;
        bytes.reverse();
        hex::encode(bytes)
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Hash256({})", self.to_hex())
    }
}

impl Serialize for Hash256 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

fn serialize_hex<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex::encode(bytes))
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct OutPoint {
    pub txid: Hash256,
    pub vout: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TxIn {
    pub prevout: OutPoint,
    #[serde(serialize_with = "serialize_hex")]
    pub script_sig: Vec<u8>,
    pub sequence: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TxOut {
    pub value: i64,
    #[serde(serialize_with = "serialize_hex")]
    pub script_pubkey: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Tx {
    pub version: i32,
    pub inputs: Vec<TxIn>,
    pub outputs: Vec<TxOut>,
    pub lock_time: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BlockHeader {
    pub version: i32,
    pub prev_block: Hash256,
    pub merkle_root: Hash256,
    pub time: u32,
    pub bits: u32,
    pub nonce: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Block {
    pub header: BlockHeader,
    pub txs: Vec<Tx>,
}

impl Default for Tx {
    fn default() -> Self {
        Tx {
            version: TX_VERSION,
            inputs: vec![],
            outputs: vec![],
            lock_time: 0,
        }
    }
}

impl Tx {
    pub fn id(&self) -> Hash256 {
        Hash256(sha256d(&self.to_vec()))
    }
}

impl BlockHeader {
    pub fn hash(&self) -> Hash256 {
        Hash256(sha256d(&self.to_vec()))
    }
}

impl Block {
    pub fn hash(&self) -> Hash256 {
        self.header.hash()
    }
}

impl ReadWrite for Hash256 {
    fn write(&self, w: &mut impl Write) -> io::Result<()> {
        w.write_all(&self.0)
    }

    fn read(r: &mut impl Read) -> io::Result<Self> {
        let mut hash = [0; HASH_LEN];
        r.read_exact(&mut hash)?;
        Ok(Hash256(hash))
    }
}

impl ReadWrite for OutPoint {
    fn write(&self, w: &mut impl Write) -> io::Result<()> {
        self.txid.write(w)?;
        w.write_all(&self.vout.to_le_bytes())
    }

    fn read(r: &mut impl Read) -> io::Result<Self> {
        let txid = Hash256::read(r)?;
        let vout = u32::from_le_bytes(read_array(r)?);
        Ok(OutPoint { txid, vout })
    }
}

impl ReadWrite for TxIn {
    fn write(&self, w: &mut impl Write) -> io::Result<()> {
        self.prevout.write(w)?;
        write_bytes(w, &self.script_sig)?;
        w.write_all(&self.sequence.to_le_bytes())
    }

    fn read(r: &mut impl Read) -> io::Result<Self> {
        let prevout = OutPoint::read(r)?;
        let script_sig = read_bytes(r)?;
        let sequence = u32::from_le_bytes(read_array(r)?);
        Ok(TxIn {
            prevout,
            script_sig,
            sequence,
        })
    }
}

impl ReadWrite for TxOut {
    fn write(&self, w: &mut impl Write) -> io::Result<()> {
        w.write_all(&self.value.to_le_bytes())?;
        write_bytes(w, &self.script_pubkey)
    }

    fn read(r: &mut impl Read) -> io::Result<Self> {
        let value = i64::from_le_bytes(read_array(r)?);
        let script_pubkey = read_bytes(r)?;
        Ok(TxOut {
            value,
            script_pubkey,
        })
    }
}

impl ReadWrite for Tx {
    fn write(&self, w: &mut impl Write) -> io::Result<()> {
        w.write_all(&self.version.to_le_bytes())?;
        write_vec(w, &self.inputs)?;
        write_vec(w, &self.outputs)?;
        w.write_all(&self.lock_time.to_le_bytes())
    }

    fn read(r: &mut impl Read) -> io::Result<Self> {
        let version = i32::from_le_bytes(read_array(r)?);
        let inputs = read_vec(r)?;
        let outputs = read_vec(r)?;
        let lock_time = u32::from_le_bytes(read_array(r)?);
        Ok(Tx {
            version,
            inputs,
            outputs,
            lock_time,
        })
    }
}

impl ReadWrite for BlockHeader {
    fn write(&self, w: &mut impl Write) -> io::Result<()> {
        w.write_all(&self.version.to_le_bytes())?;
        self.prev_block.write(w)?;
        self.merkle_root.write(w)?;
        w.write_all(&self.time.to_le_bytes())?;
        w.write_all(&self.bits.to_le_bytes())?;
        w.write_all(&self.nonce.to_le_bytes())
    }

    fn read(r: &mut impl Read) -> io::Result<Self> {
        Ok(BlockHeader {
            version: i32::from_le_bytes(read_array(r)?),
            prev_block: Hash256::read(r)?,
            merkle_root: Hash256::read(r)?,
            time: u32::from_le_bytes(read_array(r)?),
            bits: u32::from_le_bytes(read_array(r)?),
            nonce: u32::from_le_bytes(read_array(r)?),
        })
    }
}

impl ReadWrite for Block {
    fn write(&self, w: &mut impl Write) -> io::Result<()> {
        self.header.write(w)?;
        write_vec(w, &self.txs)
    }

    fn read(r: &mut impl Read) -> io::Result<Self> {
        let header = BlockHeader::read(r)?;
        let txs = read_vec(r)?;
        Ok(Block { header, txs })
    }
}

pub fn sha256d(data: &[u8]) -> [u8; HASH_LEN] {
    let mut hash = [0; HASH_LEN];
    hash.copy_from_slice(&Sha256::digest(Sha256::digest(data)));
    hash
}

pub trait ReadWrite {
    fn write(&self, w: &mut impl Write) -> io::Result<()>;

    fn read(r: &mut impl Read) -> io::Result<Self>
    where
        Self: Sized;

    fn to_vec(&self) -> Vec<u8> {
        let mut buf = vec![];
        // Writing into a Vec cannot fail
        let _ = self.write(&mut buf);
        buf
    }

    fn from_bytes(buf: &[u8]) -> io::Result<Self>
    where
        Self: Sized,
    {
        let mut cursor = io::Cursor::new(buf);
        let value = Self::read(&mut cursor)?;
        if cursor.position() as usize != buf.len() {
            Err(io::Error::new(io::ErrorKind::InvalidData, "extra data"))?;
        }
        Ok(value)
    }
}

fn read_array<const N: usize>(r: &mut impl Read) -> io::Result<[u8; N]> {
    let mut buf = [0; N];
    r.read_exact(&mut buf)?;
    Ok(buf)
}

fn write_bytes(w: &mut impl Write, bytes: &[u8]) -> io::Result<()> {
    write_varint(w, bytes.len() as u64)?;
    w.write_all(bytes)
}

fn read_bytes(r: &mut impl Read) -> io::Result<Vec<u8>> {
    let len = read_varint(r)?;
    let mut bytes = vec![];
    // A bogus length must not allocate up front
    r.take(len).read_to_end(&mut bytes)?;
    if bytes.len() as u64 != len {
        Err(io::Error::from(io::ErrorKind::UnexpectedEof))?;
    }
    Ok(bytes)
}

fn write_vec<T: ReadWrite>(w: &mut impl Write, items: &[T]) -> io::Result<()> {
    write_varint(w, items.len() as u64)?;
    items.iter().try_for_each(|item| item.write(w))
}

fn read_vec<T: ReadWrite>(r: &mut impl Read) -> io::Result<Vec<T>> {
    let len = read_varint(r)?;
    let mut items = vec![];
    for _ in 0..len {
        items.push(T::read(r)?);
    }
    Ok(items)
}

pub fn write_varint(w: &mut impl Write, n: u64) -> io::Result<()> {
    if n < 0xfd {
        w.write_all(&[n as u8])
    } else if n <= 0xffff {
        w.write_all(&[0xfd])?;
        w.write_all(&(n as u16).to_le_bytes())
    } else if n <= 0xffffffff {
        w.write_all(&[0xfe])?;
        w.write_all(&(n as u32).to_le_bytes())
    } else {
        w.write_all(&[0xff])?;
        w.write_all(&n.to_le_bytes())
    }
}

pub fn read_varint(r: &mut impl Read) -> io::Result<u64> {
    let n = read_array::<1>(r)?[0] as u64;
    if n < 0xfd {
        Ok(n)
    } else if n == 0xfd {
        Ok(u16::from_le_bytes(read_array(r)?) as u64)
    } else if n == 0xfe {
        Ok(u32::from_le_bytes(read_array(r)?) as u64)
    } else {
        Ok(u64::from_le_bytes(read_array(r)?))
    }
}
