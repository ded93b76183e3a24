//! Core data types for the validation boundary.

use base64::engine::general_purpose;
use base64::Engine as _;

/// Validation data produced by one boundary invocation.
///
/// An opaque byte payload, owned by the caller once returned. The boundary
/// guarantees it is non-empty; it never inspects or interprets the contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationData {
    bytes: Vec<u8>,
}

impl ValidationData {
    /// Wrap a copied-out payload.
    ///
    /// Only the extraction path constructs these, after the non-empty
    /// check has passed.
    pub(crate) fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Length of the payload in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the payload is empty. Always false for data that crossed
    /// the boundary, kept for API completeness.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Borrow the payload.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Take ownership of the payload.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Encode the payload as standard base64, the transport form expected
    /// by the registration flow upstream of this boundary.
    #[must_use]
    pub fn to_base64(&self) -> String {
        general_purpose::STANDARD.encode(&self.bytes)
    }
}

impl AsRef<[u8]> for ValidationData {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exposes_payload() {
        let data = ValidationData::new(vec![0xAB; 32]);
        assert_eq!(data.len(), 32);
        assert!(!data.is_empty());
        assert_eq!(data.as_bytes(), &[0xAB; 32][..]);
        assert_eq!(data.clone().into_bytes(), vec![0xAB; 32]);
    }

    #[test]
    fn test_base64_transport_encoding() {
        let data = ValidationData::new(vec![1, 2, 3]);
        assert_eq!(data.to_base64(), "AQID");
    }
}
