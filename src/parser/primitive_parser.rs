use encoding_rs::WINDOWS_1252;
use nom::bytes::complete::take;
use nom::error::{Error, ErrorKind};
use nom::{number, IResult, Parser};

/// Maximum number of bytes of a variable length quantity.
const VLQ_MAX_BYTES: usize = 4;

/// Parse unsigned byte
pub fn parse_u8(i: &[u8]) -> IResult<&[u8], u8> {
    number::complete::be_u8(i)
}

/// Parse big endian unsigned short
pub fn parse_u16(i: &[u8]) -> IResult<&[u8], u16> {
    number::complete::be_u16(i)
}

/// Parse big endian unsigned 32
pub fn parse_u32(i: &[u8]) -> IResult<&[u8], u32> {
    number::complete::be_u32(i)
}

/// Parse a variable length quantity.
/// 7 bits per byte, most significant first, high bit set on all but the last byte.
pub fn parse_vlq(i: &[u8]) -> IResult<&[u8], u32> {
    let mut value: u32 = 0;
    let mut rest = i;
    for _ in 0..VLQ_MAX_BYTES {
        let (inner, byte) = parse_u8(rest)?;
        rest = inner;
        value = (value << 7) | u32::from(byte & 0x7F);
        if byte & 0x80 == 0 {
            return Ok((rest, value));
        }
    }
    log::debug!("Variable length quantity longer than {VLQ_MAX_BYTES} bytes");
    Err(nom::Err::Error(Error::new(i, ErrorKind::TooLarge)))
}

/// Parse a VLQ length followed by that many bytes.
pub fn parse_vlq_sized_bytes(i: &[u8]) -> IResult<&[u8], &[u8]> {
    let (i, len) = parse_vlq(i)?;
    take(len as usize).parse(i)
}

/// Materialize properly encoded String
pub fn make_string(i: &[u8]) -> String {
    let (cow, encoding_used, had_errors) = WINDOWS_1252.decode(i);
    if had_errors {
        log::debug!("Error parsing string with {encoding_used:?}");
        match std::str::from_utf8(i) {
            Ok(s) => s.to_string(),
            Err(e) => {
                log::debug!("Error UTF-8 string parsing:{e}");
                String::new()
            }
        }
    } else {
        cow.to_string()
    }
}
