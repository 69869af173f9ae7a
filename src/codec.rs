//! Binary codec for SEG-Y header fields and sample data
//!
//! Everything on disk is big-endian. Header fields are signed 16- or
//! 32-bit integers; samples are encoded according to the volume's
//! [`SampleFormat`] and always surface as `f32`.

use crate::error::{Result, SegyError};
use crate::types::SampleFormat;
use num_traits::NumCast;

fn check_span(buf_len: usize, offset: usize, width: usize) -> Result<()> {
    match offset.checked_add(width) {
        Some(end) if end <= buf_len => Ok(()),
        _ => Err(SegyError::OutOfRange(format!(
            "{}-byte value at byte {} does not fit in a {}-byte record",
            width, offset, buf_len
        ))),
    }
}

/// Decode a big-endian signed integer of `width` bytes (2 or 4) at a 0-based offset
pub fn decode_int(buf: &[u8], offset: usize, width: usize) -> Result<i32> {
    check_span(buf.len(), offset, width)?;
    let bytes = &buf[offset..offset + width];
    match width {
        2 => Ok(i16::from_be_bytes([bytes[0], bytes[1]]) as i32),
        4 => Ok(i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])),
        _ => Err(SegyError::InvalidArgument(format!(
            "unsupported integer width {}",
            width
        ))),
    }
}

/// Encode a big-endian signed integer of `width` bytes (2 or 4) at a 0-based offset.
///
/// Bounds and value range are validated before the buffer is touched.
pub fn encode_int(buf: &mut [u8], offset: usize, width: usize, value: i32) -> Result<()> {
    check_span(buf.len(), offset, width)?;
    match width {
        2 => {
            let v = i16::try_from(value).map_err(|_| {
                SegyError::OutOfRange(format!("value {} does not fit in a 2-byte field", value))
            })?;
            buf[offset..offset + 2].copy_from_slice(&v.to_be_bytes());
        }
        4 => buf[offset..offset + 4].copy_from_slice(&value.to_be_bytes()),
        _ => {
            return Err(SegyError::InvalidArgument(format!(
                "unsupported integer width {}",
                width
            )))
        }
    }
    Ok(())
}

/// Convert the bit pattern of an IBM single precision float to an IEEE `f32`
pub fn ibm_to_ieee(ibm: u32) -> f32 {
    let sign = ibm >> 31;
    let mut fraction = ibm << 8;
    let mut exp = ((ibm >> 24) & 0x7f) as i32;

    if fraction == 0 {
        return f32::from_bits(sign << 31);
    }

    // base 16, bias 64, radix point before the first digit
    // -> base 2, bias 127, radix point after the first digit
    exp = (exp << 2) - 130;

    while fraction < 0x8000_0000 {
        exp -= 1;
        fraction <<= 1;
    }

    if exp <= 0 {
        fraction = if exp < -24 { 0 } else { fraction >> (-exp) };
        exp = 0;
    } else if exp >= 255 {
        fraction = 0;
        exp = 255;
    } else {
        fraction <<= 1;
    }

    f32::from_bits((fraction >> 9) | ((exp as u32) << 23) | (sign << 31))
}

/// Convert an IEEE `f32` to the bit pattern of an IBM single precision float
pub fn ieee_to_ibm(value: f32) -> u32 {
    let bits = value.to_bits();
    let sign = bits >> 31;
    let mut fraction = bits << 9;
    let mut exp = ((bits >> 23) & 0xff) as i32;

    if exp == 255 {
        // infinity and NaN map to the largest representable magnitude
        return 0x7fff_ffff | (sign << 31);
    }

    if exp > 0 {
        fraction = (fraction >> 1) | 0x8000_0000;
    } else if fraction == 0 {
        return sign << 31;
    }

    exp += 130;
    fraction >>= (-exp) & 3;
    exp = (exp + 3) >> 2;

    while fraction < 0x1000_0000 {
        exp -= 1;
        fraction <<= 4;
    }

    (fraction >> 8) | ((exp as u32 & 0x7f) << 24) | (sign << 31)
}

/// Decode one sample at the start of `bytes`
pub fn decode_sample(bytes: &[u8], format: SampleFormat) -> f32 {
    match format {
        SampleFormat::IbmFloat32 => {
            ibm_to_ieee(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
        }
        SampleFormat::IeeeFloat32 => f32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
        SampleFormat::Int32 => {
            i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as f32
        }
        SampleFormat::Int16 => i16::from_be_bytes([bytes[0], bytes[1]]) as f32,
        SampleFormat::Int8 => bytes[0] as i8 as f32,
    }
}

fn cast_sample<T: NumCast>(value: f32, format: SampleFormat) -> Result<T> {
    num_traits::cast::<f32, T>(value.round()).ok_or_else(|| {
        SegyError::OutOfRange(format!(
            "sample value {} cannot be stored as {}",
            value, format
        ))
    })
}

/// Encode one sample into the start of `out`
pub fn encode_sample(value: f32, format: SampleFormat, out: &mut [u8]) -> Result<()> {
    match format {
        SampleFormat::IbmFloat32 => out[..4].copy_from_slice(&ieee_to_ibm(value).to_be_bytes()),
        SampleFormat::IeeeFloat32 => out[..4].copy_from_slice(&value.to_be_bytes()),
        SampleFormat::Int32 => {
            let v: i32 = cast_sample(value, format)?;
            out[..4].copy_from_slice(&v.to_be_bytes());
        }
        SampleFormat::Int16 => {
            let v: i16 = cast_sample(value, format)?;
            out[..2].copy_from_slice(&v.to_be_bytes());
        }
        SampleFormat::Int8 => {
            let v: i8 = cast_sample(value, format)?;
            out[0] = v as u8;
        }
    }
    Ok(())
}

/// Decode a whole sample array. `out.len()` samples are read from `bytes`.
pub fn decode_samples(bytes: &[u8], format: SampleFormat, out: &mut [f32]) -> Result<()> {
    let width = format.size_in_bytes();
    if bytes.len() != out.len() * width {
        return Err(SegyError::LengthMismatch {
            expected: out.len() * width,
            actual: bytes.len(),
        });
    }
    for (sample, chunk) in out.iter_mut().zip(bytes.chunks_exact(width)) {
        *sample = decode_sample(chunk, format);
    }
    Ok(())
}

/// Encode a whole sample array into `out`, which must hold exactly `samples.len()` samples.
///
/// On error `out` may hold partially encoded data; callers encode into
/// scratch space and only commit the buffer on success.
pub fn encode_samples<'a, I>(samples: I, format: SampleFormat, out: &mut [u8]) -> Result<()>
where
    I: IntoIterator<Item = &'a f32>,
{
    let width = format.size_in_bytes();
    let expected = out.len() / width;
    let mut iter = samples.into_iter();
    for (actual, chunk) in out.chunks_exact_mut(width).enumerate() {
        match iter.next() {
            Some(&value) => encode_sample(value, format, chunk)?,
            None => return Err(SegyError::LengthMismatch { expected, actual }),
        }
    }
    let extra = iter.count();
    if extra > 0 {
        return Err(SegyError::LengthMismatch {
            expected,
            actual: expected + extra,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_fields() {
        let mut buf = [0u8; 8];
        encode_int(&mut buf, 0, 4, -2).unwrap();
        encode_int(&mut buf, 4, 2, 1000).unwrap();
        assert_eq!(&buf[..4], &[0xff, 0xff, 0xff, 0xfe]);
        assert_eq!(&buf[4..6], &[0x03, 0xe8]);
        assert_eq!(decode_int(&buf, 0, 4).unwrap(), -2);
        assert_eq!(decode_int(&buf, 4, 2).unwrap(), 1000);
    }

    #[test]
    fn test_int_bounds_checked_before_write() {
        let mut buf = [0u8; 4];
        assert!(encode_int(&mut buf, 2, 4, 7).unwrap_err().is_out_of_range());
        assert!(encode_int(&mut buf, 0, 2, 70_000).unwrap_err().is_out_of_range());
        assert_eq!(buf, [0u8; 4]);
        assert!(decode_int(&buf, 3, 2).is_err());
        assert!(decode_int(&buf, usize::MAX, 2).is_err());
    }

    #[test]
    fn test_ibm_known_values() {
        // 0x42640000 is the IBM encoding of 100.0
        assert_eq!(ibm_to_ieee(0x4264_0000), 100.0);
        assert_eq!(ieee_to_ibm(100.0), 0x4264_0000);
        // -118.625 from the classic IBM reference example
        assert_eq!(ibm_to_ieee(0xc276_a000), -118.625);
        assert_eq!(ieee_to_ibm(-118.625), 0xc276_a000);
        assert_eq!(ibm_to_ieee(0), 0.0);
        assert_eq!(ieee_to_ibm(0.0), 0);
        assert_eq!(ieee_to_ibm(1.0), 0x4110_0000);
    }

    #[test]
    fn test_ibm_preserves_common_values() {
        for &v in &[1.0f32, 0.5, 4.2, -3.25, 1.0e-5, 12345.678, 0.001] {
            let back = ibm_to_ieee(ieee_to_ibm(v));
            assert!((back - v).abs() <= v.abs() * 1e-6, "{} -> {}", v, back);
        }
    }

    #[test]
    fn test_ibm_infinity_clamps() {
        assert_eq!(ieee_to_ibm(f32::INFINITY), 0x7fff_ffff);
        assert_eq!(ieee_to_ibm(f32::NEG_INFINITY), 0xffff_ffff);
    }

    #[test]
    fn test_samples_by_format() {
        let values = [1.0f32, -2.0, 3.0];
        for format in [
            SampleFormat::IbmFloat32,
            SampleFormat::IeeeFloat32,
            SampleFormat::Int32,
            SampleFormat::Int16,
            SampleFormat::Int8,
        ] {
            let mut bytes = vec![0u8; values.len() * format.size_in_bytes()];
            encode_samples(&values, format, &mut bytes).unwrap();
            let mut out = [0f32; 3];
            decode_samples(&bytes, format, &mut out).unwrap();
            assert_eq!(out, values, "{}", format);
        }
    }

    #[test]
    fn test_integer_sample_overflow() {
        let mut bytes = [0u8; 1];
        let err = encode_sample(300.0, SampleFormat::Int8, &mut bytes).unwrap_err();
        assert!(err.is_out_of_range());
    }

    #[test]
    fn test_encode_samples_length_mismatch() {
        let mut bytes = [0u8; 8];
        let err = encode_samples(&[1.0f32], SampleFormat::IeeeFloat32, &mut bytes).unwrap_err();
        assert!(matches!(
            err,
            SegyError::LengthMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }
}
