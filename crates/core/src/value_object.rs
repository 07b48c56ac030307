//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have **no identity**: an installment quote for `3x $ 367` is
/// the same quote wherever it was computed. They are immutable; "changing" one
/// means computing a new one.
///
/// ```ignore
/// #[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// struct Installment {
///     per_installment: u64,
///     total: u64,
/// }
///
/// impl ValueObject for Installment {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
