use crate::error::MarketError;
use crate::model::{PlatformPrice, PlatformStatus};
use rust_decimal::Decimal;

pub fn new_platform(
    platform_id: &str,
    name: &str,
    today_price: Decimal,
    regular_price: Decimal,
    status: PlatformStatus,
    now: i64,
) -> Result<PlatformPrice, MarketError> {
    check_prices(today_price, regular_price)?;
    Ok(PlatformPrice {
        platform_id: platform_id.to_owned(),
        name: name.to_owned(),
        today_price,
        regular_price,
        status,
        updated_at: now,
    })
}

/// Admin price edit. Submissions and assignments keep the price they
/// snapshotted, so this never reprices recorded units.
pub fn update_price(
    platform: &mut PlatformPrice,
    today_price: Decimal,
    regular_price: Decimal,
    status: PlatformStatus,
    now: i64,
) -> Result<(), MarketError> {
    check_prices(today_price, regular_price)?;
    platform.today_price = today_price;
    platform.regular_price = regular_price;
    platform.status = status;
    platform.updated_at = now;
    Ok(())
}

fn check_prices(today_price: Decimal, regular_price: Decimal) -> Result<(), MarketError> {
    if today_price < Decimal::ZERO || regular_price < Decimal::ZERO {
        return Err(MarketError::Validation(
            "platform prices can not be negative".to_owned(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_price_replaces_all_fields() {
        let mut platform = new_platform(
            "fb",
            "Facebook",
            Decimal::new(125, 1),
            Decimal::from(15),
            PlatformStatus::Buying,
            0,
        )
        .unwrap();
        update_price(
            &mut platform,
            Decimal::from(14),
            Decimal::from(16),
            PlatformStatus::Closed,
            10,
        )
        .unwrap();
        assert_eq!(platform.today_price, Decimal::from(14));
        assert_eq!(platform.status, PlatformStatus::Closed);
        assert_eq!(platform.updated_at, 10);
    }

    #[test]
    fn negative_prices_are_rejected() {
        let result = new_platform(
            "ig",
            "Instagram",
            Decimal::from(-1),
            Decimal::from(10),
            PlatformStatus::Buying,
            0,
        );
        assert!(matches!(result, Err(MarketError::Validation(_))));
    }
}
