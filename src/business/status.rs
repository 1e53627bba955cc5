//! Stock and status derivation
//!
//! `stock = quantity - sold`, then thresholded against the minimum quantity.

use crate::database::ItemStatus;

/// Units left on the shelf, or `None` when more was sold than received
pub fn derive_stock(quantity: u32, sold: u32) -> Option<u32> {
    quantity.checked_sub(sold)
}

/// Status for a given stock level
pub fn derive_status(stock: u32, min_quantity: u32) -> ItemStatus {
    if stock == 0 {
        ItemStatus::OutOfStock
    } else if stock < min_quantity {
        ItemStatus::LowStock
    } else {
        ItemStatus::InStock
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_stock() {
        assert_eq!(derive_stock(10, 3), Some(7));
        assert_eq!(derive_stock(10, 10), Some(0));
        assert_eq!(derive_stock(0, 0), Some(0));
        assert_eq!(derive_stock(3, 4), None);
    }

    #[test]
    fn test_derive_status_thresholds() {
        assert_eq!(derive_status(0, 0), ItemStatus::OutOfStock);
        assert_eq!(derive_status(0, 5), ItemStatus::OutOfStock);
        assert_eq!(derive_status(4, 5), ItemStatus::LowStock);
        assert_eq!(derive_status(5, 5), ItemStatus::InStock);
        assert_eq!(derive_status(1, 0), ItemStatus::InStock);
    }

    #[test]
    fn test_status_total_over_small_grid() {
        for quantity in 0..30u32 {
            for sold in 0..=quantity {
                for min_quantity in 0..30u32 {
                    let stock = derive_stock(quantity, sold).unwrap();
                    let status = derive_status(stock, min_quantity);

                    let expected = if stock == 0 {
                        ItemStatus::OutOfStock
                    } else if stock < min_quantity {
                        ItemStatus::LowStock
                    } else {
                        ItemStatus::InStock
                    };
                    assert_eq!(status, expected);
                    assert_ne!(status, ItemStatus::Unknown);
                }
            }
        }
    }

    #[test]
    fn test_extremes() {
        assert_eq!(derive_stock(u32::MAX, 0), Some(u32::MAX));
        assert_eq!(derive_status(u32::MAX, u32::MAX), ItemStatus::InStock);
        assert_eq!(derive_status(u32::MAX - 1, u32::MAX), ItemStatus::LowStock);
    }
}
