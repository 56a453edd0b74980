/*
 * SPDX-License-Identifier: MIT
 *
 * Permission is hereby granted, free of charge, to any person obtaining a
 * copy of this software and associated documentation files (the "Software"),
 * to deal in the Software without restriction, including without limitation
 * the rights to use, copy, modify, merge, publish, distribute, sublicense,
 * and/or sell copies of the Software, and to permit persons to whom the
 * Software is furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in
 * all copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL
 * THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
 * FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
 * DEALINGS IN THE SOFTWARE.
 */
// field_map.rs
// Static tables translating canonical field names to vendor wire keys.

use std::collections::HashSet;

use crate::model::MinerVendor;
use crate::ConfigError;

/// A fixed, bidirectional table between canonical field names and the
/// exact wire keys one vendor uses for them.
///
/// Tables are `const` data and are never mutated. Each table must be
/// bijective: two canonical names may not share a wire key and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMapping {
    vendor: MinerVendor,
    fields: &'static [(&'static str, &'static str)],
}

impl FieldMapping {
    pub const fn new(vendor: MinerVendor, fields: &'static [(&'static str, &'static str)]) -> Self {
        FieldMapping { vendor, fields }
    }

    pub fn vendor(&self) -> MinerVendor {
        self.vendor
    }

    /// Wire key for a canonical field name.
    pub fn wire_key(&self, canonical: &str) -> Result<&'static str, ConfigError> {
        self.fields
            .iter()
            .find(|(name, _)| *name == canonical)
            .map(|(_, wire)| *wire)
            .ok_or_else(|| self.unknown(canonical))
    }

    /// Canonical field name for a wire key.
    pub fn canonical_name(&self, wire: &str) -> Result<&'static str, ConfigError> {
        self.fields
            .iter()
            .find(|(_, key)| *key == wire)
            .map(|(name, _)| *name)
            .ok_or_else(|| self.unknown(wire))
    }

    pub fn contains_wire_key(&self, wire: &str) -> bool {
        self.fields.iter().any(|(_, key)| *key == wire)
    }

    /// (canonical, wire) pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.fields.iter().copied()
    }

    pub fn wire_keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(_, wire)| *wire)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn is_bijective(&self) -> bool {
        let names: HashSet<_> = self.fields.iter().map(|(n, _)| *n).collect();
        let keys: HashSet<_> = self.fields.iter().map(|(_, k)| *k).collect();
        names.len() == self.fields.len() && keys.len() == self.fields.len()
    }

    fn unknown(&self, field: &str) -> ConfigError {
        ConfigError::UnknownField {
            vendor: self.vendor,
            field: field.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: FieldMapping = FieldMapping::new(
        MinerVendor::EspMiner,
        &[("display_timeout", "displayTimeout"), ("rotation", "rotation")],
    );

    #[test]
    fn test_lookup_both_directions() {
        assert_eq!(TABLE.wire_key("display_timeout").unwrap(), "displayTimeout");
        assert_eq!(TABLE.canonical_name("displayTimeout").unwrap(), "display_timeout");
        assert_eq!(TABLE.wire_key("rotation").unwrap(), "rotation");
    }

    // Lookups are exact: the canonical name is not accepted as a wire key.
    #[test]
    fn test_unknown_field() {
        let err = TABLE.wire_key("network_difficulty").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownField { ref field, .. } if field == "network_difficulty"));
        assert!(TABLE.canonical_name("display_timeout").is_err());
        assert!(!TABLE.contains_wire_key("display_timeout"));
    }

    #[test]
    fn test_declaration_order() {
        let keys: Vec<_> = TABLE.wire_keys().collect();
        assert_eq!(keys, vec!["displayTimeout", "rotation"]);
        assert_eq!(TABLE.len(), 2);
    }

    #[test]
    fn test_is_bijective() {
        assert!(TABLE.is_bijective());
        let broken = FieldMapping::new(MinerVendor::EspMiner, &[("a", "x"), ("b", "x")]);
        assert!(!broken.is_bijective());
    }
}
