use super::*;

fn dec(s: &str) -> Decimal {
    s.parse().expect("valid decimal literal")
}

#[test]
fn test_fees_reference_example() {
    // ₹1000 → 30 each side, 60 platform, 1030 buyer total, 970 seller payout
    let fees = calculate_fees(dec("1000"));
    assert_eq!(fees.buyer_fee, dec("30.00"));
    assert_eq!(fees.seller_fee, dec("30.00"));
    assert_eq!(fees.platform_fee, dec("60.00"));
    assert_eq!(fees.buyer_total, dec("1030.00"));
    assert_eq!(fees.seller_receives, dec("970.00"));
}

#[test]
fn test_fees_accepted_offer_example() {
    let fees = calculate_fees(dec("900"));
    assert_eq!(fees.buyer_fee, dec("27.00"));
    assert_eq!(fees.seller_fee, dec("27.00"));
    assert_eq!(fees.platform_fee, dec("54.00"));
}

#[test]
fn test_platform_fee_reconciles_exactly() {
    // The reconciliation must hold in stored (rounded) form for awkward
    // amounts, not just round numbers.
    for amount in ["0.01", "1", "33.33", "99.99", "1234.56", "999999.99"] {
        let fees = calculate_fees(dec(amount));
        assert_eq!(
            fees.platform_fee,
            fees.buyer_fee + fees.seller_fee,
            "platform fee must equal the two side fees for {amount}"
        );
        assert_eq!(
            fees.buyer_total - fees.seller_receives,
            fees.buyer_fee + fees.seller_fee,
            "spread must equal twice the per-side fee for {amount}"
        );
    }
}

#[test]
fn test_fee_rounding_half_up() {
    // 3% of 10.25 = 0.3075 → rounds to 0.31, applied identically to both sides
    let fees = calculate_fees(dec("10.25"));
    assert_eq!(fees.buyer_fee, dec("0.31"));
    assert_eq!(fees.seller_fee, dec("0.31"));
    assert_eq!(fees.platform_fee, dec("0.62"));
    assert_eq!(fees.buyer_total, dec("10.56"));
    assert_eq!(fees.seller_receives, dec("9.94"));
}

#[test]
fn test_minor_unit_conversion() {
    // The rupee→paise conversion is a classic off-by-factor spot; pin it.
    assert_eq!(to_minor_units(dec("900")), Some(90_000));
    assert_eq!(to_minor_units(dec("1030.00")), Some(103_000));
    assert_eq!(to_minor_units(dec("0.01")), Some(1));
    assert_eq!(to_minor_units(dec("10.555")), Some(1056)); // rounds first

    assert_eq!(from_minor_units(90_000), dec("900"));
    assert_eq!(from_minor_units(1), dec("0.01"));
}

#[test]
fn test_round_money_precision() {
    // Classic floating point problem does not exist in Decimal: 0.1 + 0.2 == 0.3
    assert_eq!(dec("0.1") + dec("0.2"), dec("0.3"));
    assert_eq!(round_money(dec("2.005")), dec("2.01"));
    assert_eq!(round_money(dec("2.004")), dec("2.00"));
}
