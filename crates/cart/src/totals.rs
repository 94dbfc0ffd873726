//! Pricing a cart against the catalog.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use kiosk_catalog::CatalogStore;
use kiosk_core::{ItemId, Money, ValueObject};

use crate::cart::Cart;

/// Price and discount of an item as the catalog has them right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UnitPrice {
    pub price: Money,
    pub discount: Money,
}

impl UnitPrice {
    pub fn new(price: Money, discount: Money) -> Self {
        Self { price, discount }
    }

    /// `max(price - discount, 0)`.
    pub fn effective(&self) -> Money {
        self.price.saturating_sub(self.discount)
    }
}

/// Resolves an item id to its current unit price.
///
/// `None` means the item is gone from the catalog; such lines price at zero.
pub trait PriceLookup {
    fn unit_price(&self, item_id: ItemId) -> Option<UnitPrice>;
}

impl PriceLookup for CatalogStore {
    fn unit_price(&self, item_id: ItemId) -> Option<UnitPrice> {
        self.get(item_id)
            .map(|item| UnitPrice::new(item.price(), item.discount()))
    }
}

impl PriceLookup for HashMap<ItemId, UnitPrice> {
    fn unit_price(&self, item_id: ItemId) -> Option<UnitPrice> {
        self.get(&item_id).copied()
    }
}

impl<L: PriceLookup + ?Sized> PriceLookup for &L {
    fn unit_price(&self, item_id: ItemId) -> Option<UnitPrice> {
        (**self).unit_price(item_id)
    }
}

/// Adapts a closure `Fn(ItemId) -> Option<UnitPrice>` into a [`PriceLookup`].
#[derive(Debug, Clone, Copy)]
pub struct FnLookup<F>(pub F);

impl<F> PriceLookup for FnLookup<F>
where
    F: Fn(ItemId) -> Option<UnitPrice>,
{
    fn unit_price(&self, item_id: ItemId) -> Option<UnitPrice> {
        (self.0)(item_id)
    }
}

/// Sales tax rate in basis points (1/100 of a percent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxRate {
    basis_points: u32,
}

impl TaxRate {
    /// The kiosk's fixed 10%.
    pub const STANDARD: TaxRate = TaxRate { basis_points: 1_000 };

    pub const fn from_basis_points(basis_points: u32) -> Self {
        Self { basis_points }
    }

    pub const fn basis_points(self) -> u32 {
        self.basis_points
    }

    /// Tax due on `amount`, rounded half-up to the cent.
    pub fn tax_on(self, amount: Money) -> Money {
        let scaled = u128::from(amount.cents()) * u128::from(self.basis_points) + 5_000;
        Money::from_cents(u64::try_from(scaled / 10_000).unwrap_or(u64::MAX))
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl ValueObject for TaxRate {}

impl core::fmt::Display for TaxRate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let whole = self.basis_points / 100;
        match self.basis_points % 100 {
            0 => write!(f, "{whole}%"),
            frac => write!(f, "{whole}.{frac:02}%"),
        }
    }
}

/// Derived cart totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CartTotals {
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
    pub item_count: u32,
}

/// A cart line priced at the time of the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PricedLine {
    pub item_id: ItemId,
    pub quantity: u32,
    /// `None` when the item has been deleted from the catalog.
    pub unit_price: Option<UnitPrice>,
    pub line_total: Money,
}

impl Cart {
    /// Price every line against `lookup`, in cart order.
    pub fn priced_lines<'a, L>(&'a self, lookup: &'a L) -> impl Iterator<Item = PricedLine> + 'a
    where
        L: PriceLookup + ?Sized,
    {
        self.lines().iter().map(move |line| {
            let unit_price = lookup.unit_price(line.item_id());
            let line_total = unit_price
                .map(|p| p.effective().times(line.quantity()))
                .unwrap_or(Money::ZERO);
            PricedLine {
                item_id: line.item_id(),
                quantity: line.quantity(),
                unit_price,
                line_total,
            }
        })
    }

    /// Subtotal, tax and total against the catalog's current prices.
    ///
    /// Lines whose item no longer exists contribute nothing, to the amounts
    /// or to `item_count`.
    pub fn compute_totals<L>(&self, lookup: &L, tax_rate: TaxRate) -> CartTotals
    where
        L: PriceLookup + ?Sized,
    {
        let (subtotal, item_count) = self
            .priced_lines(lookup)
            .filter(|line| line.unit_price.is_some())
            .fold((Money::ZERO, 0u32), |(sum, count), line| {
                (sum + line.line_total, count.saturating_add(line.quantity))
            });
        let tax = tax_rate.tax_on(subtotal);
        CartTotals {
            subtotal,
            tax,
            total: subtotal + tax,
            item_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiosk_catalog::ItemDraft;

    fn item(price: u64, discount: u64) -> ItemDraft {
        ItemDraft {
            name: "Item".to_string(),
            category: "Meals".to_string(),
            price: Money::from_cents(price),
            discount: Money::from_cents(discount),
            ..ItemDraft::default()
        }
    }

    #[test]
    fn worked_example_from_the_menu() {
        let mut catalog = CatalogStore::new();
        let a = catalog.add_item(item(1_000, 200));
        let b = catalog.add_item(item(500, 0));

        let mut cart = Cart::new();
        cart.add_to_cart(a);
        cart.add_to_cart(a);
        cart.add_to_cart(b);

        let totals = cart.compute_totals(&catalog, TaxRate::STANDARD);
        assert_eq!(totals.subtotal, Money::from_cents(2_100));
        assert_eq!(totals.tax, Money::from_cents(210));
        assert_eq!(totals.total, Money::from_cents(2_310));
        assert_eq!(totals.item_count, 3);
    }

    #[test]
    fn totals_read_current_prices_not_snapshots() {
        let mut catalog = CatalogStore::new();
        let a = catalog.add_item(item(1_000, 0));
        let mut cart = Cart::new();
        cart.add_to_cart(a);

        catalog.update_item(
            a,
            kiosk_catalog::ItemPatch {
                price: Some(Money::from_cents(400)),
                ..Default::default()
            },
        );

        let totals = cart.compute_totals(&catalog, TaxRate::STANDARD);
        assert_eq!(totals.subtotal, Money::from_cents(400));
    }

    #[test]
    fn deleted_item_contributes_zero() {
        let mut catalog = CatalogStore::new();
        let a = catalog.add_item(item(1_000, 0));
        let b = catalog.add_item(item(500, 0));
        let mut cart = Cart::new();
        cart.add_to_cart(a);
        cart.add_to_cart(a);
        cart.add_to_cart(b);

        catalog.delete_item(a);

        let totals = cart.compute_totals(&catalog, TaxRate::STANDARD);
        assert_eq!(totals.subtotal, Money::from_cents(500));
        assert_eq!(totals.total, Money::from_cents(550));
        assert_eq!(totals.item_count, 1);
        assert_eq!(cart.item_count(), 3);

        let priced: Vec<_> = cart.priced_lines(&catalog).collect();
        assert_eq!(priced[0].unit_price, None);
        assert_eq!(priced[0].line_total, Money::ZERO);
    }

    #[test]
    fn closure_lookup_is_supported() {
        let known = ItemId::new();
        let lookup = FnLookup(|id: ItemId| {
            (id == known).then(|| UnitPrice::new(Money::from_cents(300), Money::from_cents(500)))
        });

        let mut cart = Cart::new();
        cart.add_to_cart(known);
        cart.add_to_cart(known);

        let totals = cart.compute_totals(&lookup, TaxRate::STANDARD);
        // Discount above price floors the effective price at zero.
        assert_eq!(totals.total, Money::ZERO);
    }

    #[test]
    fn empty_cart_totals_are_zero() {
        let totals = Cart::new().compute_totals(&CatalogStore::new(), TaxRate::default());
        assert_eq!(totals, CartTotals::default());
    }

    #[test]
    fn tax_rounds_half_up_to_the_cent() {
        let rate = TaxRate::STANDARD;
        assert_eq!(rate.tax_on(Money::from_cents(105)), Money::from_cents(11));
        assert_eq!(rate.tax_on(Money::from_cents(104)), Money::from_cents(10));
        assert_eq!(TaxRate::from_basis_points(825).tax_on(Money::from_cents(1_000)), Money::from_cents(83));
    }

    #[test]
    fn tax_rate_display() {
        assert_eq!(TaxRate::STANDARD.to_string(), "10%");
        assert_eq!(TaxRate::from_basis_points(825).to_string(), "8.25%");
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: totals are deterministic and internally consistent.
            #[test]
            fn totals_are_deterministic(
                prices in proptest::collection::vec((0u64..100_000, 0u64..100_000, 1u32..20), 1..10),
                bps in 0u32..3_000,
            ) {
                let mut lookup = HashMap::new();
                let mut cart = Cart::new();
                for (price, discount, qty) in prices {
                    let id = ItemId::new();
                    lookup.insert(id, UnitPrice::new(Money::from_cents(price), Money::from_cents(discount)));
                    for _ in 0..qty {
                        cart.add_to_cart(id);
                    }
                }
                let rate = TaxRate::from_basis_points(bps);

                let first = cart.compute_totals(&lookup, rate);
                let second = cart.compute_totals(&lookup, rate);

                prop_assert_eq!(first, second);
                prop_assert_eq!(first.total, first.subtotal + first.tax);
                prop_assert!(first.tax <= first.subtotal || bps > 10_000);
            }
        }
    }
}
