//! Transform output shapes: what `transform` hands to `predict`.
//!
//! Most effects pass a single tensor through. Some need sidecar payloads
//! alongside the primary data (precomputed bases, masks, calendar encodings);
//! [`TransformOutput`] covers all three conventions with one tagged union.
//! The engine only ever inspects the primary payload; sidecars are private
//! between an effect's own `transform` and `predict`.
//!
//! ## Conventions
//! - In a [`TransformOutput::Tuple`], the first element is the primary
//!   payload and `extras` keep their order.
//! - In a [`TransformOutput::Bundle`], the key `"data"`
//!   ([`TransformOutput::PRIMARY_KEY`]) is reserved for the primary payload;
//!   a bundle without it fails the engine's shape check, naming the effect.
use crate::data::tensor::Tensor;
use std::collections::BTreeMap;

/// Payload produced by `transform` and consumed by `predict`.
#[derive(Debug, Clone, PartialEq)]
pub enum TransformOutput {
    /// A single tensor; the common case and the default `transform`'s shape.
    Tensor(Tensor),
    /// An ordered tuple: the primary payload plus positional sidecars.
    Tuple { primary: Tensor, extras: Vec<Tensor> },
    /// A keyed bundle; the `"data"` entry is the primary payload.
    Bundle(BTreeMap<String, Tensor>),
}

impl TransformOutput {
    /// Reserved bundle key holding the primary payload.
    pub const PRIMARY_KEY: &'static str = "data";

    /// The primary payload, if present.
    ///
    /// Always present for the tensor and tuple conventions; `None` only for
    /// a bundle missing the reserved key.
    pub fn primary(&self) -> Option<&Tensor> {
        match self {
            TransformOutput::Tensor(tensor) => Some(tensor),
            TransformOutput::Tuple { primary, .. } => Some(primary),
            TransformOutput::Bundle(map) => map.get(Self::PRIMARY_KEY),
        }
    }

    /// Positional sidecars of a tuple; empty for the other conventions.
    pub fn extras(&self) -> &[Tensor] {
        match self {
            TransformOutput::Tuple { extras, .. } => extras,
            _ => &[],
        }
    }

    /// Keyed sidecar lookup for bundles; `None` for the other conventions
    /// and for absent keys.
    pub fn extra(&self, key: &str) -> Option<&Tensor> {
        match self {
            TransformOutput::Bundle(map) => map.get(key),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Primary-payload resolution for each convention.
    // - Sidecar access for tuples and bundles.
    // -------------------------------------------------------------------------

    fn tensor(value: f64) -> Tensor {
        Tensor::Single(array![[value]])
    }

    #[test]
    // Purpose
    // -------
    // Verify primary-payload resolution across the three conventions.
    //
    // Given
    // -----
    // - A plain tensor, a tuple, a bundle with the reserved key, and a bundle
    //   without it.
    //
    // Expect
    // ------
    // - The first three resolve to their primary tensor; the keyless bundle
    //   resolves to `None`.
    fn primary_resolves_per_convention() {
        let plain = TransformOutput::Tensor(tensor(1.0));
        let tuple = TransformOutput::Tuple { primary: tensor(2.0), extras: vec![tensor(9.0)] };
        let mut keyed = BTreeMap::new();
        keyed.insert(TransformOutput::PRIMARY_KEY.to_string(), tensor(3.0));
        let bundle = TransformOutput::Bundle(keyed);
        let mut sidecar_only = BTreeMap::new();
        sidecar_only.insert("mask".to_string(), tensor(4.0));
        let keyless = TransformOutput::Bundle(sidecar_only);

        assert_eq!(plain.primary(), Some(&tensor(1.0)));
        assert_eq!(tuple.primary(), Some(&tensor(2.0)));
        assert_eq!(bundle.primary(), Some(&tensor(3.0)));
        assert_eq!(keyless.primary(), None);
    }

    #[test]
    // Purpose
    // -------
    // Verify sidecar access for tuples and bundles.
    //
    // Given
    // -----
    // - A tuple with one extra and a bundle with a "mask" entry.
    //
    // Expect
    // ------
    // - `extras()` exposes the tuple sidecars in order and is empty
    //   elsewhere; `extra("mask")` resolves only on the bundle.
    fn sidecars_are_private_to_their_convention() {
        let tuple = TransformOutput::Tuple { primary: tensor(1.0), extras: vec![tensor(9.0)] };
        let mut keyed = BTreeMap::new();
        keyed.insert(TransformOutput::PRIMARY_KEY.to_string(), tensor(1.0));
        keyed.insert("mask".to_string(), tensor(5.0));
        let bundle = TransformOutput::Bundle(keyed);

        assert_eq!(tuple.extras(), &[tensor(9.0)]);
        assert_eq!(tuple.extra("mask"), None);
        assert!(bundle.extras().is_empty());
        assert_eq!(bundle.extra("mask"), Some(&tensor(5.0)));
    }
}
