use num_bigint::{BigInt, Sign};

/// Encodes a number as a script number: little-endian magnitude with the sign
/// in the high bit of the last byte. Zero is the empty string.
pub fn encode_num(n: &BigInt) -> Vec<u8> {
    let (sign, mut bytes) = n.to_bytes_le();
    if sign == Sign::NoSign {
        return vec![];
    }
    let negative = sign == Sign::Minus;
    let last = bytes.len() - 1;
    if bytes[last] & 0x80 != 0 {
        bytes.push(if negative { 0x80 } else { 0 });
    } else if negative {
        bytes[last] |= 0x80;
    }
    bytes
}

/// Decodes a script number. Non-minimal encodings are accepted.
pub fn decode_num(buf: &[u8]) -> BigInt {
    let Some((&last, _)) = buf.split_last() else {
        return BigInt::default();
    };
    let mut magnitude = buf.to_vec();
    let negative = last & 0x80 != 0;
    if let Some(top) = magnitude.last_mut() {
        *top &= 0x7f;
    }
    let sign = if negative { Sign::Minus } else { Sign::Plus };
    BigInt::from_bytes_le(sign, &magnitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_num() {
        use super::encode_num;
        assert_eq!(encode_num(&BigInt::from(0)), Vec::<u8>::new());
        assert_eq!(encode_num(&BigInt::from(1)), vec![0x01]);
        assert_eq!(encode_num(&BigInt::from(-1)), vec![0x81]);
        assert_eq!(encode_num(&BigInt::from(127)), vec![0x7f]);
        assert_eq!(encode_num(&BigInt::from(-127)), vec![0xff]);
        assert_eq!(encode_num(&BigInt::from(128)), vec![0x80, 0x00]);
        assert_eq!(encode_num(&BigInt::from(-128)), vec![0x80, 0x80]);
        assert_eq!(encode_num(&BigInt::from(255)), vec![0xff, 0x00]);
        assert_eq!(encode_num(&BigInt::from(256)), vec![0x00, 0x01]);
        assert_eq!(encode_num(&BigInt::from(-256)), vec![0x00, 0x81]);
        assert_eq!(encode_num(&BigInt::from(32767)), vec![0xff, 0x7f]);
        assert_eq!(encode_num(&BigInt::from(32768)), vec![0x00, 0x80, 0x00]);
        let v = vec![0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x7f];
        assert_eq!(encode_num(&BigInt::from(i64::MAX)), v);
        let v = vec![0, 0, 0, 0, 0, 0, 0, 0x80, 0x80];
        assert_eq!(encode_num(&BigInt::from(i64::MIN)), v);
    }

    #[test]
    fn decode_num() {
        use super::decode_num;
        assert_eq!(decode_num(&[]), BigInt::from(0));
        assert_eq!(decode_num(&[0x01]), BigInt::from(1));
        assert_eq!(decode_num(&[0x81]), BigInt::from(-1));
        assert_eq!(decode_num(&[0x80, 0x00]), BigInt::from(128));
        assert_eq!(decode_num(&[0x80, 0x80]), BigInt::from(-128));
        assert_eq!(decode_num(&[0x00, 0x81]), BigInt::from(-256));
        assert_eq!(decode_num(&[0x80]), BigInt::from(0));
        assert_eq!(decode_num(&[0x01, 0x00, 0x00]), BigInt::from(1));
        let v = [0, 0, 0, 0, 0, 0, 0, 0x80, 0x80];
        assert_eq!(decode_num(&v), BigInt::from(i64::MIN));
    }

    #[test]
    fn round_trip() {
        use rand::Rng;
        let mut rng = rand::thread_rng();
        for _ in 0..1000 {
            let n = BigInt::from(rng.gen::<i64>());
            assert_eq!(super::decode_num(&super::encode_num(&n)), n);
        }
    }
}
