use money_challenge::{
    currency::{
        default_selection, denomination_by_id, denominations, format_currency,
        resolve_denominations, Amount,
    },
    errors::ChallengeError,
};

#[test]
fn amounts_below_a_dinar_display_in_millimes() {
    assert_eq!(format_currency(Amount::from_millimes(50)), "50 مليم");
    assert_eq!(format_currency(Amount::from_millimes(999)), "999 مليم");
    assert_eq!(format_currency(Amount::from_dinars(1)), "1.000 د.ت");
    assert_eq!(format_currency(Amount::from_millimes(12_345)), "12.345 د.ت");
}

#[test]
fn text_input_parses_to_millimes() {
    assert_eq!("12".parse::<Amount>().unwrap(), Amount::from_millimes(12_000));
    assert_eq!("12.345".parse::<Amount>().unwrap(), Amount::from_millimes(12_345));
    assert_eq!("0.0305".parse::<Amount>().unwrap(), Amount::from_millimes(31));
    for bad in ["", "-1", "abc", "1.2.3", "1,5"] {
        assert!(
            matches!(Amount::parse(bad), Err(ChallengeError::InvalidAmount(_))),
            "`{bad}` should be rejected"
        );
    }
}

#[test]
fn denomination_table_covers_tunisian_coins_and_bills() {
    let table = denominations();
    assert_eq!(table.len(), 10);
    assert_eq!(table.first().unwrap().value, Amount::from_millimes(50));
    assert_eq!(table.last().unwrap().value, Amount::from_dinars(50));
    assert!(table.iter().all(|d| !d.bundle_sizes.is_empty()));
    assert_eq!(denomination_by_id("5DT").unwrap().value, Amount::from_dinars(5));
}

#[test]
fn ids_and_decimal_values_resolve_to_the_same_denomination() {
    let by_id = resolve_denominations(&["1dt", "500m"]).unwrap();
    let by_value = resolve_denominations(&["0.5", "1", "1.000"]).unwrap();
    assert_eq!(by_id, by_value);
    assert_eq!(by_id, vec![Amount::from_millimes(500), Amount::from_dinars(1)]);

    assert_eq!(resolve_denominations(&default_selection()).unwrap().len(), 5);
    assert!(matches!(
        resolve_denominations(&["7dt"]),
        Err(ChallengeError::UnknownDenomination(_))
    ));
}
