//! Cache Key Module
//!
//! Derives deterministic keys from a cache name, an operation identifier and
//! the ordered arguments of a call.

use std::fmt;

use serde::ser::{self, Serialize, Serializer};

use crate::error::{CacheError, Result};

// == Cache Key ==
/// Identifies one memoized call.
///
/// Arguments are stored as the canonical JSON encoding of the whole argument
/// tuple. JSON quoting makes each element self-delimiting, so `("ab", "c")`
/// and `("a", "bc")` never produce the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    cache_name: String,
    operation: String,
    args: String,
}

impl CacheKey {
    // == Derive ==
    /// Builds the key for `operation` called with `args`.
    ///
    /// `args` is normally a tuple such as `("World",)` or `(user_id, page)`.
    /// Maps are canonicalised through `serde_json::Value`, whose object type
    /// keeps keys sorted, so a `HashMap` argument yields a stable key.
    ///
    /// # Errors
    /// Returns `InvalidKeyDerivation` when the arguments cannot be
    /// serialized (for example a map with non-string keys) or contain a NaN
    /// or infinite float, which JSON would collapse into `null`.
    pub fn derive<A>(cache_name: &str, operation: &str, args: &A) -> Result<Self>
    where
        A: Serialize + ?Sized,
    {
        args.serialize(FiniteFloats).map_err(|e| {
            CacheError::InvalidKeyDerivation(format!("{}: {}", operation, e))
        })?;
        let value = serde_json::to_value(args).map_err(|e| {
            CacheError::InvalidKeyDerivation(format!("{}: {}", operation, e))
        })?;
        let args = serde_json::to_string(&value).map_err(|e| {
            CacheError::InvalidKeyDerivation(format!("{}: {}", operation, e))
        })?;

        Ok(Self {
            cache_name: cache_name.to_string(),
            operation: operation.to_string(),
            args,
        })
    }

    /// Cache namespace this key belongs to.
    pub fn cache_name(&self) -> &str {
        &self.cache_name
    }

    /// Operation identifier.
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Canonical JSON encoding of the argument tuple.
    pub fn args(&self) -> &str {
        &self.args
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}::{:?}{}", self.cache_name, self.operation, self.args)
    }
}

// == Finite Float Check ==
/// Serializer that produces nothing and fails on the first NaN or infinite
/// float anywhere in the value.
struct FiniteFloats;

type Check = std::result::Result<(), serde_json::Error>;

fn finite(is_finite: bool) -> Check {
    if is_finite {
        Ok(())
    } else {
        Err(ser::Error::custom("non-finite float cannot be part of a cache key"))
    }
}

impl Serializer for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;
    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Self;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    fn serialize_bool(self, _: bool) -> Check {
        Ok(())
    }

    fn serialize_i8(self, _: i8) -> Check {
        Ok(())
    }

    fn serialize_i16(self, _: i16) -> Check {
        Ok(())
    }

    fn serialize_i32(self, _: i32) -> Check {
        Ok(())
    }

    fn serialize_i64(self, _: i64) -> Check {
        Ok(())
    }

    fn serialize_i128(self, _: i128) -> Check {
        Ok(())
    }

    fn serialize_u8(self, _: u8) -> Check {
        Ok(())
    }

    fn serialize_u16(self, _: u16) -> Check {
        Ok(())
    }

    fn serialize_u32(self, _: u32) -> Check {
        Ok(())
    }

    fn serialize_u64(self, _: u64) -> Check {
        Ok(())
    }

    fn serialize_u128(self, _: u128) -> Check {
        Ok(())
    }

    fn serialize_f32(self, v: f32) -> Check {
        finite(v.is_finite())
    }

    fn serialize_f64(self, v: f64) -> Check {
        finite(v.is_finite())
    }

    fn serialize_char(self, _: char) -> Check {
        Ok(())
    }

    fn serialize_str(self, _: &str) -> Check {
        Ok(())
    }

    fn serialize_bytes(self, _: &[u8]) -> Check {
        Ok(())
    }

    fn serialize_none(self) -> Check {
        Ok(())
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Check {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Check {
        Ok(())
    }

    fn serialize_unit_struct(self, _: &'static str) -> Check {
        Ok(())
    }

    fn serialize_unit_variant(self, _: &'static str, _: u32, _: &'static str) -> Check {
        Ok(())
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _: &'static str,
        value: &T,
    ) -> Check {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        value: &T,
    ) -> Check {
        value.serialize(self)
    }

    fn serialize_seq(self, _: Option<usize>) -> std::result::Result<Self, serde_json::Error> {
        Ok(self)
    }

    fn serialize_tuple(self, _: usize) -> std::result::Result<Self, serde_json::Error> {
        Ok(self)
    }

    fn serialize_tuple_struct(
        self,
        _: &'static str,
        _: usize,
    ) -> std::result::Result<Self, serde_json::Error> {
        Ok(self)
    }

    fn serialize_tuple_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> std::result::Result<Self, serde_json::Error> {
        Ok(self)
    }

    fn serialize_map(self, _: Option<usize>) -> std::result::Result<Self, serde_json::Error> {
        Ok(self)
    }

    fn serialize_struct(
        self,
        _: &'static str,
        _: usize,
    ) -> std::result::Result<Self, serde_json::Error> {
        Ok(self)
    }

    fn serialize_struct_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> std::result::Result<Self, serde_json::Error> {
        Ok(self)
    }
}

impl ser::SerializeSeq for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Check {
        value.serialize(FiniteFloats)
    }

    fn end(self) -> Check {
        Ok(())
    }
}

impl ser::SerializeTuple for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Check {
        value.serialize(FiniteFloats)
    }

    fn end(self) -> Check {
        Ok(())
    }
}

impl ser::SerializeTupleStruct for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Check {
        value.serialize(FiniteFloats)
    }

    fn end(self) -> Check {
        Ok(())
    }
}

impl ser::SerializeTupleVariant for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Check {
        value.serialize(FiniteFloats)
    }

    fn end(self) -> Check {
        Ok(())
    }
}

impl ser::SerializeMap for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Check {
        key.serialize(FiniteFloats)
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Check {
        value.serialize(FiniteFloats)
    }

    fn end(self) -> Check {
        Ok(())
    }
}

impl ser::SerializeStruct for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, _: &'static str, value: &T) -> Check {
        value.serialize(FiniteFloats)
    }

    fn end(self) -> Check {
        Ok(())
    }
}

impl ser::SerializeStructVariant for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, _: &'static str, value: &T) -> Check {
        value.serialize(FiniteFloats)
    }

    fn end(self) -> Check {
        Ok(())
    }
}
