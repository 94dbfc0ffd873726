//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have **no identity**. Two values with the same attributes are
/// equal, and "changing" one means producing a new value.
///
/// - **Value Object**: `Money::from_cents(150)` equals any other `$1.50`
/// - **Entity**: a `MenuItem` is the same item after its price is edited
///
/// ```ignore
/// #[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// struct TaxRate { basis_points: u32 }
///
/// impl ValueObject for TaxRate {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
