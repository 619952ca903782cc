//! Cart Aggregate
//!
//! Line items are keyed by (product id, option descriptor). Adding an
//! existing key merges into the line instead of duplicating it.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Totals;
use crate::{Result, StoreError};

/// One purchasable variant in the visitor's in-progress order. `price` and
/// `name` are snapshots taken at add time so later catalog edits do not
/// change the cart.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: String,
    pub name: String,
    pub price: i64,
    /// Selected size/color combination, e.g. "M/Black".
    pub option: String,
    pub quantity: u32,
}

impl CartLine {
    pub fn line_total(&self) -> i64 {
        self.price * i64::from(self.quantity)
    }
}

/// Result of an add: callers phrase their confirmation message differently
/// depending on whether a new line appeared or an existing one grew.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    QuantityUpdated,
}

#[derive(Clone, Debug, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn subtotal(&self) -> i64 {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    pub fn totals(&self) -> Totals {
        Totals::from_subtotal(self.subtotal())
    }

    /// Merge-aware add. A line already holding the (product, option) key
    /// absorbs the requested quantity; otherwise a new line is appended in
    /// insertion order. Quantity is clamped to at least 1.
    pub fn add(&mut self, product_id: impl Into<String>, name: impl Into<String>, price: i64, option: impl Into<String>, quantity: u32) -> AddOutcome {
        let product_id = product_id.into();
        let option = option.into();
        let quantity = quantity.max(1);
        if let Some(existing) = self.find_mut(&product_id, &option) {
            existing.quantity += quantity;
            return AddOutcome::QuantityUpdated;
        }
        self.lines.push(CartLine { product_id, name: name.into(), price, option, quantity });
        AddOutcome::Added
    }

    /// Set a line's quantity, clamping to a minimum of 1. Driving a line to
    /// zero goes through `remove` instead.
    pub fn update_quantity(&mut self, product_id: &str, option: &str, quantity: i64) -> Result<u32> {
        let line = self
            .find_mut(product_id, option)
            .ok_or_else(|| StoreError::NotFound(format!("no cart line for product {product_id} ({option})")))?;
        line.quantity = quantity.clamp(1, i64::from(u32::MAX)) as u32;
        Ok(line.quantity)
    }

    pub fn remove(&mut self, product_id: &str, option: &str) -> Result<()> {
        let before = self.lines.len();
        self.lines.retain(|l| !(l.product_id == product_id && l.option == option));
        if self.lines.len() == before {
            return Err(StoreError::NotFound(format!("no cart line for product {product_id} ({option})")));
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    fn find_mut(&mut self, product_id: &str, option: &str) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|l| l.product_id == product_id && l.option == option)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn knit(qty: u32) -> (&'static str, &'static str, i64, &'static str, u32) {
        ("1", "Pastel Knit", 39_000, "M/Ivory", qty)
    }

    #[test]
    fn test_add_merges_by_key() {
        let mut cart = Cart::new();
        let (id, name, price, opt, _) = knit(0);
        assert_eq!(cart.add(id, name, price, opt, 2), AddOutcome::Added);
        assert_eq!(cart.add(id, name, price, opt, 3), AddOutcome::QuantityUpdated);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 5);
        // Different option is a different line
        assert_eq!(cart.add(id, name, price, "L/Mint", 1), AddOutcome::Added);
        assert_eq!(cart.lines().len(), 2);
    }

    #[test]
    fn test_update_quantity_clamps_to_one() {
        let mut cart = Cart::new();
        cart.add("3", "Basic Tee", 22_000, "Free/Black", 4);
        assert_eq!(cart.update_quantity("3", "Free/Black", 0).unwrap(), 1);
        assert_eq!(cart.update_quantity("3", "Free/Black", -7).unwrap(), 1);
        assert_eq!(cart.update_quantity("3", "Free/Black", 6).unwrap(), 6);
    }

    #[test]
    fn test_update_missing_line_is_not_found() {
        let mut cart = Cart::new();
        let err = cart.update_quantity("9", "M/Red", 2).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn test_remove_is_exact_and_failure_leaves_cart_unchanged() {
        let mut cart = Cart::new();
        cart.add("1", "Pastel Knit", 39_000, "M/Ivory", 1);
        cart.add("2", "Tailored Shirt", 54_000, "S/White", 1);
        assert!(matches!(cart.remove("1", "L/Ivory"), Err(StoreError::NotFound(_))));
        assert_eq!(cart.lines().len(), 2);
        cart.remove("1", "M/Ivory").unwrap();
        assert!(cart.lines().iter().all(|l| l.product_id != "1"));
    }

    #[test]
    fn test_totals_follow_shared_rule() {
        let mut cart = Cart::new();
        assert_eq!(cart.totals().final_total, 0);
        cart.add("a", "A", 10_000, "-", 2);
        cart.add("b", "B", 5_000, "-", 1);
        let t = cart.totals();
        assert_eq!(t.subtotal, 25_000);
        assert_eq!(t.shipping_fee, 3_000);
        assert_eq!(t.final_total, 28_000);
    }
}
