//! Money arithmetic for carts and checkout. All amounts are ZAR.
//!
//! Two VAT calculations live here and are intentionally separate:
//! [`checkout_summary`] adds VAT on top of a tax-exclusive subtotal, while
//! [`calculate_vat`] can also back VAT out of a tax-inclusive price.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::CartLine,
};

pub const VAT_RATE: Decimal = dec!(0.15);
pub const FREE_SHIPPING_OVER: Decimal = dec!(500);
pub const FLAT_SHIPPING_FEE: Decimal = dec!(99);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct CheckoutSummary {
    #[schema(value_type = String)]
    pub subtotal: Decimal,
    #[schema(value_type = String)]
    pub shipping: Decimal,
    #[schema(value_type = String)]
    pub vat: Decimal,
    #[schema(value_type = String)]
    pub total: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct VatBreakdown {
    /// Amount excluding VAT.
    #[schema(value_type = String)]
    pub amount: Decimal,
    #[schema(value_type = String)]
    pub vat: Decimal,
    #[schema(value_type = String)]
    pub total: Decimal,
}

fn to_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn out_of_range() -> AppError {
    AppError::validation("order amount is out of range")
}

pub fn cart_total<'a>(lines: impl IntoIterator<Item = &'a CartLine>) -> AppResult<Decimal> {
    lines.into_iter().try_fold(Decimal::ZERO, |sum, line| {
        sum.checked_add(line.line_total()?).ok_or_else(out_of_range)
    })
}

/// Shipping is free strictly above R500; VAT is added on top of the subtotal.
pub fn checkout_summary(subtotal: Decimal) -> AppResult<CheckoutSummary> {
    let shipping = if subtotal > FREE_SHIPPING_OVER {
        Decimal::ZERO
    } else {
        FLAT_SHIPPING_FEE
    };
    let vat = to_cents(subtotal.checked_mul(VAT_RATE).ok_or_else(out_of_range)?);
    let total = subtotal
        .checked_add(shipping)
        .and_then(|t| t.checked_add(vat))
        .ok_or_else(out_of_range)?;
    Ok(CheckoutSummary {
        subtotal,
        shipping,
        vat,
        total,
    })
}

pub fn calculate_vat(amount: Decimal, includes_vat: bool) -> VatBreakdown {
    if includes_vat {
        let base = to_cents(amount / (Decimal::ONE + VAT_RATE));
        VatBreakdown {
            amount: base,
            vat: amount - base,
            total: amount,
        }
    } else {
        let vat = to_cents(amount * VAT_RATE);
        VatBreakdown {
            amount,
            vat,
            total: amount + vat,
        }
    }
}

/// Renders an amount as `R1,234.50`.
pub fn format_zar(amount: Decimal) -> String {
    let rounded = to_cents(amount);
    let rendered = format!("{:.2}", rounded.abs());
    let (whole, cents) = rendered.split_once('.').unwrap_or((rendered.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{sign}R{grouped}.{cents}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Product;
    use chrono::Utc;
    use uuid::Uuid;

    fn line(price: Decimal, qty: i32) -> CartLine {
        let product = Product::new(
            Uuid::new_v4(),
            "Biltong".into(),
            None,
            None,
            None,
            price,
            100,
            Uuid::new_v4(),
            Utc::now(),
        )
        .unwrap();
        CartLine::new(Uuid::new_v4(), Uuid::new_v4(), product, qty).unwrap()
    }

    #[test]
    fn cart_total_is_order_independent() {
        let mut lines = vec![line(dec!(19.99), 3), line(dec!(250), 1), line(dec!(0.50), 7)];
        let forward = cart_total(&lines).unwrap();
        lines.reverse();
        assert_eq!(forward, cart_total(&lines).unwrap());
        assert_eq!(forward, dec!(313.47));
    }

    #[test]
    fn empty_cart_totals_zero() {
        assert_eq!(cart_total(&Vec::<CartLine>::new()).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn summary_below_threshold_charges_shipping() {
        let s = checkout_summary(dec!(400)).unwrap();
        assert_eq!(s.shipping, dec!(99));
        assert_eq!(s.vat, dec!(60.00));
        assert_eq!(s.total, dec!(559.00));
    }

    #[test]
    fn summary_above_threshold_ships_free() {
        let s = checkout_summary(dec!(600)).unwrap();
        assert_eq!(s.shipping, Decimal::ZERO);
        assert_eq!(s.vat, dec!(90.00));
        assert_eq!(s.total, dec!(690.00));
    }

    #[test]
    fn exactly_500_still_pays_shipping() {
        let s = checkout_summary(dec!(500)).unwrap();
        assert_eq!(s.shipping, dec!(99));
        assert_eq!(s.total, dec!(674.00));
    }

    #[test]
    fn vat_backed_out_of_inclusive_price() {
        let v = calculate_vat(dec!(115), true);
        assert_eq!(v.amount, dec!(100.00));
        assert_eq!(v.vat, dec!(15.00));
        assert_eq!(v.total, dec!(115.00));
    }

    #[test]
    fn vat_added_to_exclusive_price() {
        let v = calculate_vat(dec!(100), false);
        assert_eq!(v.amount, dec!(100));
        assert_eq!(v.vat, dec!(15.00));
        assert_eq!(v.total, dec!(115.00));
    }

    #[test]
    fn formats_rand_amounts() {
        assert_eq!(format_zar(dec!(0)), "R0.00");
        assert_eq!(format_zar(dec!(99)), "R99.00");
        assert_eq!(format_zar(dec!(1234.5)), "R1,234.50");
        assert_eq!(format_zar(dec!(1234567.891)), "R1,234,567.89");
        assert_eq!(format_zar(dec!(-15)), "-R15.00");
    }

    #[test]
    fn amounts_that_round_to_zero_carry_no_sign() {
        assert_eq!(format_zar(dec!(-0.001)), "R0.00");
        assert_eq!(format_zar(dec!(-0.004)), "R0.00");
        assert_eq!(format_zar(dec!(-0.005)), "-R0.01");
        assert_eq!(format_zar(dec!(-5)), "-R5.00");
    }

    #[test]
    fn oversized_cart_total_is_an_error() {
        let huge = Product {
            price: Decimal::MAX,
            ..line(dec!(1), 1).product
        };
        let lines = vec![
            line(dec!(10), 1),
            CartLine::new(Uuid::new_v4(), Uuid::new_v4(), huge, 2).unwrap(),
        ];
        assert!(matches!(cart_total(&lines), Err(AppError::ValidationFailed(_))));
    }

    #[test]
    fn oversized_subtotal_is_an_error() {
        assert!(matches!(
            checkout_summary(Decimal::MAX),
            Err(AppError::ValidationFailed(_))
        ));
        assert!(checkout_summary(dec!(9999999999.99)).is_ok());
    }
}
