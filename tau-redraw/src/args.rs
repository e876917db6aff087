//! Positional argument extraction for redraw events.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::RedrawError;

/// The argument tuple of one event occurrence.
pub(crate) struct Args<'a> {
    event: &'a str,
    values: &'a [Value],
}

impl<'a> Args<'a> {
    pub(crate) fn new(event: &'a str, values: &'a [Value]) -> Self {
        Self { event, values }
    }

    fn get(&self, index: usize) -> Result<&'a Value, RedrawError> {
        self.values.get(index).ok_or_else(|| {
            RedrawError::malformed(
                self.event,
                format!(
                    "expected at least {} arguments, got {}",
                    index + 1,
                    self.values.len()
                ),
            )
        })
    }

    fn mismatch(&self, index: usize, expected: &str, found: &Value) -> RedrawError {
        RedrawError::malformed(
            self.event,
            format!("argument {index} should be {expected}, got {found}"),
        )
    }

    pub(crate) fn u64(&self, index: usize) -> Result<u64, RedrawError> {
        let value = self.get(index)?;
        value
            .as_u64()
            .ok_or_else(|| self.mismatch(index, "a non-negative integer", value))
    }

    pub(crate) fn u32(&self, index: usize) -> Result<u32, RedrawError> {
        let value = self.get(index)?;
        value
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| self.mismatch(index, "a grid coordinate", value))
    }

    pub(crate) fn i64(&self, index: usize) -> Result<i64, RedrawError> {
        let value = self.get(index)?;
        value
            .as_i64()
            .ok_or_else(|| self.mismatch(index, "an integer", value))
    }

    pub(crate) fn bool(&self, index: usize) -> Result<bool, RedrawError> {
        let value = self.get(index)?;
        value
            .as_bool()
            .ok_or_else(|| self.mismatch(index, "a boolean", value))
    }

    pub(crate) fn string(&self, index: usize) -> Result<String, RedrawError> {
        let value = self.get(index)?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| self.mismatch(index, "a string", value))
    }

    pub(crate) fn array(&self, index: usize) -> Result<&'a [Value], RedrawError> {
        let value = self.get(index)?;
        value
            .as_array()
            .map(Vec::as_slice)
            .ok_or_else(|| self.mismatch(index, "an array", value))
    }

    pub(crate) fn value(&self, index: usize) -> Result<Value, RedrawError> {
        self.get(index).cloned()
    }

    /// Deserialize a structured argument (maps, lists of maps).
    pub(crate) fn decode<T: DeserializeOwned>(&self, index: usize) -> Result<T, RedrawError> {
        let value = self.get(index)?;
        T::deserialize(value).map_err(|e| {
            RedrawError::malformed(self.event, format!("argument {index}: {e}"))
        })
    }
}
