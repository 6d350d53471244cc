//! Sellable and held stock for one product.
//!
//! Checkout moves units from `available` to `reserved` while a charge is in
//! flight. The charge then either settles the hold (the units are sold) or
//! releases it (the units return to sale). Catalog edits set on-hand stock,
//! which is `available + reserved`, so a replace during a pending charge does
//! not double-count the held units when they are released.

/// Stock counters kept by product repositories.
///
/// # Examples
/// ```
/// use storefront::domain::StockLevels;
///
/// let held = StockLevels::new(2, 0).reserve(2).expect("enough stock");
/// let restocked = held.restock(5);
/// assert_eq!(restocked.release(2), StockLevels::new(5, 0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StockLevels {
    available: u32,
    reserved: u32,
}

impl StockLevels {
    pub const fn new(available: u32, reserved: u32) -> Self {
        Self {
            available,
            reserved,
        }
    }

    /// Units a buyer can still reserve.
    pub const fn available(self) -> u32 {
        self.available
    }

    /// Units held by charges that have not resolved yet.
    pub const fn reserved(self) -> u32 {
        self.reserved
    }

    /// Hold `quantity` units, or `None` when fewer are available.
    pub fn reserve(self, quantity: u32) -> Option<Self> {
        let available = self.available.checked_sub(quantity)?;
        Some(Self {
            available,
            reserved: self.reserved.saturating_add(quantity),
        })
    }

    /// Return held units to sale. Never returns more than is still held.
    pub fn release(self, quantity: u32) -> Self {
        let returned = quantity.min(self.reserved);
        Self {
            available: self.available.saturating_add(returned),
            reserved: self.reserved - returned,
        }
    }

    /// Drop a hold whose charge was approved; the units are sold.
    pub fn settle(self, quantity: u32) -> Self {
        Self {
            available: self.available,
            reserved: self.reserved.saturating_sub(quantity),
        }
    }

    /// Set on-hand stock to `on_hand`, keeping outstanding holds inside it.
    ///
    /// Holds beyond the new on-hand figure are dropped, so releasing them
    /// later cannot push stock above what was set.
    pub fn restock(self, on_hand: u32) -> Self {
        let reserved = self.reserved.min(on_hand);
        Self {
            available: on_hand - reserved,
            reserved,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(StockLevels::new(2, 0), 2, Some(StockLevels::new(0, 2)))]
    #[case(StockLevels::new(2, 1), 1, Some(StockLevels::new(1, 2)))]
    #[case(StockLevels::new(1, 0), 2, None)]
    fn reserve_moves_units_into_the_hold(
        #[case] levels: StockLevels,
        #[case] quantity: u32,
        #[case] expected: Option<StockLevels>,
    ) {
        assert_eq!(levels.reserve(quantity), expected);
    }

    #[rstest]
    fn release_and_settle_resolve_a_hold() {
        let held = StockLevels::new(3, 0).reserve(2).expect("enough stock");

        assert_eq!(held.release(2), StockLevels::new(3, 0));
        assert_eq!(held.settle(2), StockLevels::new(1, 0));
    }

    #[rstest]
    #[case(5, StockLevels::new(5, 0))]
    #[case(1, StockLevels::new(1, 0))]
    #[case(0, StockLevels::new(0, 0))]
    fn declined_charge_after_restock_keeps_the_set_figure(
        #[case] on_hand: u32,
        #[case] expected: StockLevels,
    ) {
        let held = StockLevels::new(2, 0).reserve(2).expect("enough stock");

        assert_eq!(held.restock(on_hand).release(2), expected);
    }

    #[rstest]
    fn approved_charge_after_restock_sells_from_the_set_figure() {
        let held = StockLevels::new(2, 0).reserve(2).expect("enough stock");

        assert_eq!(held.restock(5).settle(2), StockLevels::new(3, 0));
    }

    #[rstest]
    fn restock_without_holds_sets_available() {
        assert_eq!(StockLevels::new(4, 0).restock(9), StockLevels::new(9, 0));
    }
}
