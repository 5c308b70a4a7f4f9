use crate::{errors::ScriptError, num::encode_num, opcodes::*};
use num_bigint::BigInt;

/// Appends the shortest push of `n`: a small-number opcode where one exists,
/// otherwise a data push of its script number encoding.
pub fn push_int(script: &mut Vec<u8>, n: i64) {
    match n {
        0 => script.push(OP_0),
        -1 => script.push(OP_1NEGATE),
        1..=16 => script.push(OP_1 + (n - 1) as u8),
        _ => push_data(script, &encode_num(&BigInt::from(n))),
    }
}

/// Appends `data` behind the smallest push opcode that can carry its length.
pub fn push_data(script: &mut Vec<u8>, data: &[u8]) {
    let len = data.len();
    if len < OP_PUSHDATA1 as usize {
        script.push(OP_PUSH + len as u8);
    } else if len <= 0xff {
        script.push(OP_PUSHDATA1);
        script.push(len as u8);
    } else if len <= 0xffff {
        script.push(OP_PUSHDATA2);
        script.extend_from_slice(&(len as u16).to_le_bytes());
    } else {
        script.push(OP_PUSHDATA4);
        script.extend_from_slice(&(len as u32).to_le_bytes());
    }
    script.extend_from_slice(data);
}

/// Reads the push at `i`, returning its opcode, payload and the offset after it.
///
/// `OP_1NEGATE` and `OP_1`..`OP_16` carry their value in the opcode and return
/// an empty payload.
pub fn read_push(script: &[u8], mut i: usize) -> Result<(u8, &[u8], usize), ScriptError> {
    let opcode = *script.get(i).ok_or(ScriptError::UnexpectedEndOfScript)?;

    i += 1;

    fn read<'a>(script: &'a [u8], i: &mut usize, len: usize) -> Result<&'a [u8], ScriptError> {
        let ret = script
            .get(*i..*i + len)
            .ok_or(ScriptError::UnexpectedEndOfScript)?;
        *i += len;
        Ok(ret)
    }

    let data: &[u8] = match opcode {
        OP_PUSH..=75 => read(script, &mut i, (opcode - OP_PUSH) as usize)?,
        OP_PUSHDATA1 => {
            let len = read(script, &mut i, 1)?[0] as usize;
            read(script, &mut i, len)?
        }
        OP_PUSHDATA2 => {
            let len_buf: [u8; 2] = read(script, &mut i, 2)?
                .try_into()
                .map_err(|_| ScriptError::UnexpectedEndOfScript)?;
            read(script, &mut i, u16::from_le_bytes(len_buf) as usize)?
        }
        OP_PUSHDATA4 => {
            let len_buf: [u8; 4] = read(script, &mut i, 4)?
                .try_into()
                .map_err(|_| ScriptError::UnexpectedEndOfScript)?;
            read(script, &mut i, u32::from_le_bytes(len_buf) as usize)?
        }
        OP_1NEGATE | OP_1..=OP_16 => &[],
        _ => return Err(ScriptError::BadOpcode),
    };

    Ok((opcode, data, i))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_int() {
        let encode = |n| {
            let mut v = vec![];
            super::push_int(&mut v, n);
            v
        };
        assert_eq!(encode(0), vec![OP_0]);
        assert_eq!(encode(-1), vec![OP_1NEGATE]);
        assert_eq!(encode(1), vec![OP_1]);
        assert_eq!(encode(16), vec![OP_16]);
        assert_eq!(encode(17), vec![OP_PUSH + 1, 17]);
        assert_eq!(encode(-2), vec![OP_PUSH + 1, 0x82]);
        assert_eq!(encode(127), vec![OP_PUSH + 1, 0x7f]);
        assert_eq!(encode(128), vec![OP_PUSH + 2, 0x80, 0x00]);
        assert_eq!(encode(-128), vec![OP_PUSH + 2, 0x80, 0x80]);
        assert_eq!(encode(1000), vec![OP_PUSH + 2, 0xe8, 0x03]);
        let v = [vec![OP_PUSH + 9], vec![0; 7], vec![0x80, 0x80]].concat();
        assert_eq!(encode(i64::MIN), v);
    }

    #[test]
    fn push_data() {
        let encode = |data: &[u8]| {
            let mut v = vec![];
            super::push_data(&mut v, data);
            v
        };
        assert_eq!(encode(&[]), vec![OP_0]);
        assert_eq!(encode(&[7]), vec![OP_PUSH + 1, 7]);
        let v = [vec![OP_PUSH + 75], vec![1; 75]].concat();
        assert_eq!(encode(&[1; 75]), v);
        let v = [vec![OP_PUSHDATA1, 76], vec![1; 76]].concat();
        assert_eq!(encode(&[1; 76]), v);
        let v = [vec![OP_PUSHDATA1, 255], vec![1; 255]].concat();
        assert_eq!(encode(&[1; 255]), v);
        let v = [vec![OP_PUSHDATA2, 0, 1], vec![1; 256]].concat();
        assert_eq!(encode(&[1; 256]), v);
        let v = [vec![OP_PUSHDATA2, 255, 255], vec![1; 65535]].concat();
        assert_eq!(encode(&[1; 65535]), v);
        let v = [vec![OP_PUSHDATA4, 0, 0, 1, 0], vec![1; 65536]].concat();
        assert_eq!(encode(&[1; 65536]), v);
    }

    #[test]
    fn read_push() {
        use super::read_push;
        assert_eq!(read_push(&[OP_0], 0).unwrap(), (OP_0, &[][..], 1));
        assert_eq!(read_push(&[OP_16], 0).unwrap(), (OP_16, &[][..], 1));
        assert_eq!(read_push(&[OP_1NEGATE], 0).unwrap(), (OP_1NEGATE, &[][..], 1));
        let v = [OP_DUP, OP_PUSH + 2, 1, 2, OP_DUP];
        assert_eq!(read_push(&v, 1).unwrap(), (OP_PUSH + 2, &[1, 2][..], 4));
        let v = [OP_PUSHDATA1, 1, 9];
        assert_eq!(read_push(&v, 0).unwrap(), (OP_PUSHDATA1, &[9][..], 3));
        let v = [OP_PUSHDATA2, 1, 0, 9];
        assert_eq!(read_push(&v, 0).unwrap(), (OP_PUSHDATA2, &[9][..], 4));
        let v = [OP_PUSHDATA4, 1, 0, 0, 0, 9];
        assert_eq!(read_push(&v, 0).unwrap(), (OP_PUSHDATA4, &[9][..], 6));
        let v = [vec![OP_PUSHDATA2, 0, 1], vec![0; 256]].concat();
        assert_eq!(read_push(&v, 0).unwrap().2, 259);

        let r = read_push(&[], 0);
        assert!(matches!(r, Err(ScriptError::UnexpectedEndOfScript)));
        let r = read_push(&[OP_0], 1);
        assert!(matches!(r, Err(ScriptError::UnexpectedEndOfScript)));
        let r = read_push(&[OP_PUSH + 2, 1], 0);
        assert!(matches!(r, Err(ScriptError::UnexpectedEndOfScript)));
        let r = read_push(&[OP_PUSHDATA1], 0);
        assert!(matches!(r, Err(ScriptError::UnexpectedEndOfScript)));
        let r = read_push(&[OP_PUSHDATA2, 0], 0);
        assert!(matches!(r, Err(ScriptError::UnexpectedEndOfScript)));
        let r = read_push(&[OP_PUSHDATA4, 1, 0, 0, 0], 0);
        assert!(matches!(r, Err(ScriptError::UnexpectedEndOfScript)));
        assert!(matches!(read_push(&[OP_DUP], 0), Err(ScriptError::BadOpcode)));
        assert!(matches!(read_push(&[OP_RESERVED], 0), Err(ScriptError::BadOpcode)));
    }
}
