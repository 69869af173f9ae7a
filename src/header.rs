//! Field access over header records
//!
//! A [`Header`] wraps the bytes of one trace header or binary header and
//! reads/writes fields straight through to those bytes; it keeps no
//! decoded copy. Fields are addressed by catalog entry, by standard byte
//! position, or by mnemonic; every form resolves through the same catalog.

use crate::codec;
use crate::error::{Result, SegyError};
use crate::field::{BinaryLayout, RecordLayout, TraceLayout};
use std::collections::HashMap;
use std::marker::PhantomData;

/// A reference to a header field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldRef<F> {
    /// A catalog entry
    Field(F),
    /// A standard byte position (1-based for trace headers, 3201-based for binary headers)
    Position(i64),
    /// A SEG-Y mnemonic such as `"INLINE_3D"`
    Name(String),
}

impl<F> From<i32> for FieldRef<F> {
    fn from(position: i32) -> Self {
        FieldRef::Position(position as i64)
    }
}

impl<F> From<&str> for FieldRef<F> {
    fn from(name: &str) -> Self {
        FieldRef::Name(name.to_string())
    }
}

impl From<crate::field::TraceField> for FieldRef<crate::field::TraceField> {
    fn from(field: crate::field::TraceField) -> Self {
        FieldRef::Field(field)
    }
}

impl From<crate::field::BinField> for FieldRef<crate::field::BinField> {
    fn from(field: crate::field::BinField) -> Self {
        FieldRef::Field(field)
    }
}

/// Typed access to the fields of one header record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header<L: RecordLayout, B = Vec<u8>> {
    buf: B,
    layout: PhantomData<L>,
}

/// An owned 240-byte trace header
pub type TraceHeader = Header<TraceLayout>;

/// An owned 400-byte binary header
pub type BinaryHeader = Header<BinaryLayout>;

impl<L: RecordLayout> Header<L> {
    /// A zero-filled record
    pub fn new() -> Self {
        Self {
            buf: vec![0u8; L::SIZE],
            layout: PhantomData,
        }
    }

    /// Take ownership of raw record bytes
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Self::view(bytes)
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

impl<L: RecordLayout> Default for Header<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: RecordLayout, B: AsRef<[u8]>> Header<L, B> {
    /// Wrap an existing buffer, which must be exactly one record long
    pub fn view(buf: B) -> Result<Self> {
        let len = buf.as_ref().len();
        if len != L::SIZE {
            return Err(SegyError::LengthMismatch {
                expected: L::SIZE,
                actual: len,
            });
        }
        Ok(Self {
            buf,
            layout: PhantomData,
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.buf.as_ref()
    }

    /// Copy into an owned header
    pub fn to_owned_header(&self) -> Header<L> {
        Header {
            buf: self.buf.as_ref().to_vec(),
            layout: PhantomData,
        }
    }

    /// Resolve a field reference to its catalog entry
    fn lookup(key: &FieldRef<L::Field>) -> Result<L::Field> {
        let field = match key {
            FieldRef::Field(field) => *field,
            FieldRef::Name(name) => L::field_named(name).ok_or_else(|| {
                SegyError::OutOfRange(format!("unknown {} field name '{}'", L::NAME, name))
            })?,
            FieldRef::Position(position) => {
                let first = L::FIRST_BYTE as i64;
                let last = first + L::SIZE as i64 - 1;
                if *position < first || *position > last {
                    return Err(SegyError::OutOfRange(format!(
                        "byte {} is outside the {} (bytes {}..={})",
                        position,
                        L::NAME,
                        first,
                        last
                    )));
                }
                L::field_at(*position).ok_or_else(|| {
                    SegyError::OutOfRange(format!(
                        "byte {} does not start a {} field",
                        position,
                        L::NAME
                    ))
                })?
            }
        };
        Ok(field)
    }

    /// Resolve a field reference to its 0-based offset and width within the record
    fn resolve(&self, key: &FieldRef<L::Field>) -> Result<(usize, usize)> {
        let field = Self::lookup(key)?;
        Ok((
            L::field_position(field) - L::FIRST_BYTE,
            L::field_width(field),
        ))
    }

    /// Read one field
    pub fn get(&self, key: impl Into<FieldRef<L::Field>>) -> Result<i32> {
        let (offset, width) = self.resolve(&key.into())?;
        codec::decode_int(self.buf.as_ref(), offset, width)
    }

    /// Read several fields at once, keyed by catalog field whatever form
    /// each was asked for in
    pub fn get_many<K, I>(&self, keys: I) -> Result<HashMap<L::Field, i32>>
    where
        K: Into<FieldRef<L::Field>>,
        I: IntoIterator<Item = K>,
    {
        keys.into_iter()
            .map(|key| {
                let field = Self::lookup(&key.into())?;
                Ok((field, self.get(FieldRef::Field(field))?))
            })
            .collect()
    }

    /// Every catalog field with its current value, in byte order
    pub fn fields(&self) -> impl Iterator<Item = (L::Field, i32)> + '_ {
        L::all_fields().iter().filter_map(move |&field| {
            let offset = L::field_position(field) - L::FIRST_BYTE;
            codec::decode_int(self.buf.as_ref(), offset, L::field_width(field))
                .ok()
                .map(|value| (field, value))
        })
    }
}

impl<L: RecordLayout, B: AsRef<[u8]> + AsMut<[u8]>> Header<L, B> {
    /// Write one field
    pub fn set(&mut self, key: impl Into<FieldRef<L::Field>>, value: i32) -> Result<()> {
        let (offset, width) = self.resolve(&key.into())?;
        codec::encode_int(self.buf.as_mut(), offset, width, value)
    }

    /// Apply `(field, value)` assignments in order; later entries win.
    ///
    /// Either every assignment lands or none does.
    pub fn set_many<K, I>(&mut self, assignments: I) -> Result<()>
    where
        K: Into<FieldRef<L::Field>>,
        I: IntoIterator<Item = (K, i32)>,
    {
        let mut scratch = self.buf.as_ref().to_vec();
        for (key, value) in assignments {
            let (offset, width) = self.resolve(&key.into())?;
            codec::encode_int(&mut scratch, offset, width, value)?;
        }
        self.buf.as_mut().copy_from_slice(&scratch);
        Ok(())
    }

    /// Raw copy of every byte of `other`
    pub fn copy_from<B2: AsRef<[u8]>>(&mut self, other: &Header<L, B2>) -> Result<()> {
        self.copy_from_bytes(other.as_bytes())
    }

    /// Raw copy from a byte slice of identical record size
    pub fn copy_from_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let dst = self.buf.as_mut();
        if dst.len() != bytes.len() {
            return Err(SegyError::LengthMismatch {
                expected: dst.len(),
                actual: bytes.len(),
            });
        }
        dst.copy_from_slice(bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{BinField, TraceField};

    #[test]
    fn test_get_set_by_field_and_position() {
        let mut header = TraceHeader::new();
        header.set(TraceField::Inline3D, 1000).unwrap();
        assert_eq!(header.get(189).unwrap(), 1000);
        assert_eq!(header.get("INLINE_3D").unwrap(), 1000);

        header.set(193, -7).unwrap();
        assert_eq!(header.get(TraceField::Crossline3D).unwrap(), -7);
        assert_eq!(&header.as_bytes()[192..196], &(-7i32).to_be_bytes());
    }

    #[test]
    fn test_invalid_positions() {
        let mut header = TraceHeader::new();
        for position in [188, -1, 0, 241, 700] {
            assert!(header.get(position).unwrap_err().is_out_of_range());
            assert!(header.set(position, 1).unwrap_err().is_out_of_range());
        }
        assert_eq!(header.as_bytes(), &[0u8; 240][..]);

        let between = header.get(188).unwrap_err().to_string();
        let outside = header.get(700).unwrap_err().to_string();
        let unknown = header.get("NOT_A_FIELD").unwrap_err().to_string();
        assert!(between.contains("does not start"));
        assert!(outside.contains("outside"));
        assert!(unknown.contains("unknown"));
    }

    #[test]
    fn test_binary_positions() {
        let mut bin = BinaryHeader::new();
        bin.set(3213, 5).unwrap();
        assert_eq!(bin.get(BinField::Traces).unwrap(), 5);
        assert!(bin.get(0).is_err());
        assert!(bin.get(50000).is_err());
        assert!(bin.get(3214).is_err());
        assert!(bin.get(3261).is_err());
    }

    #[test]
    fn test_get_many_matches_get() {
        let mut header = TraceHeader::new();
        header
            .set_many([
                (TraceField::Inline3D, 43),
                (TraceField::Crossline3D, 11),
                (TraceField::Offset, 15),
            ])
            .unwrap();

        let fields = [TraceField::Offset, TraceField::Inline3D, TraceField::Crossline3D];
        let values = header.get_many(fields).unwrap();
        assert_eq!(values.len(), 3);
        for field in fields {
            assert_eq!(values[&field], header.get(field).unwrap());
        }

        let by_key = header.get_many([189, 193]).unwrap();
        assert_eq!(by_key[&TraceField::Inline3D], 43);
        assert_eq!(by_key[&TraceField::Crossline3D], 11);
        assert!(header.get_many(["INLINE_3D", "NOPE"]).unwrap_err().is_out_of_range());
    }

    #[test]
    fn test_set_many_later_wins() {
        let mut header = TraceHeader::new();
        header
            .set_many([(TraceField::Offset, 1), (TraceField::Offset, 2)])
            .unwrap();
        assert_eq!(header.get(TraceField::Offset).unwrap(), 2);
    }

    #[test]
    fn test_set_many_is_all_or_nothing() {
        let mut header = TraceHeader::new();
        let err = header
            .set_many([
                (FieldRef::Field(TraceField::Inline3D), 5),
                (FieldRef::Position(188), 1),
            ])
            .unwrap_err();
        assert!(err.is_out_of_range());
        assert_eq!(header.get(TraceField::Inline3D).unwrap(), 0);
    }

    #[test]
    fn test_view_writes_through() {
        let mut bytes = vec![0u8; 240];
        {
            let mut view = Header::<TraceLayout, _>::view(&mut bytes[..]).unwrap();
            view.set(TraceField::Offset, 3).unwrap();
        }
        assert_eq!(&bytes[36..40], &3i32.to_be_bytes());
        assert!(Header::<TraceLayout, _>::view(&bytes[..10]).is_err());
    }

    #[test]
    fn test_copy_from() {
        let mut src = TraceHeader::new();
        src.set(TraceField::Cdp, 99).unwrap();
        let mut dst = TraceHeader::new();
        dst.copy_from(&src).unwrap();
        assert_eq!(dst, src);
        assert!(matches!(
            dst.copy_from_bytes(&[0u8; 400]),
            Err(SegyError::LengthMismatch { expected: 240, actual: 400 })
        ));
    }

    #[test]
    fn test_fields_iterates_catalog() {
        let mut header = TraceHeader::new();
        header.set(TraceField::SampleCount, 50).unwrap();
        let all: Vec<_> = header.fields().collect();
        assert_eq!(all.len(), TraceField::ALL.len());
        assert!(all.contains(&(TraceField::SampleCount, 50)));
    }

    fn nonzero<L: RecordLayout>(header: &Header<L>) -> Vec<(L::Field, i32)> {
        header.fields().filter(|&(_, value)| value != 0).collect()
    }

    #[test]
    fn test_fields_generic_over_layout() {
        let mut bin = BinaryHeader::new();
        bin.set(BinField::Samples, 50).unwrap();
        bin.set(BinField::Format, 1).unwrap();
        assert_eq!(nonzero(&bin), vec![(BinField::Samples, 50), (BinField::Format, 1)]);

        let mut trace = TraceHeader::new();
        trace.set(TraceField::Inline3D, 7).unwrap();
        assert_eq!(nonzero(&trace), vec![(TraceField::Inline3D, 7)]);
    }
}
