//! Amount charged to an apartment for one fee of an invoice

use rust_decimal::Decimal;

use super::model::FeeAmounts;
use crate::domain::fee::{Fee, FeeType};

/// Monthly parking rates per vehicle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleRates {
    pub car: Decimal,
    pub motorbike: Decimal,
}

impl Default for VehicleRates {
    fn default() -> Self {
        Self {
            car: Decimal::from(1_200_000),
            motorbike: Decimal::from(70_000),
        }
    }
}

/// The apartment figures fee charges depend on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApartmentUsage {
    pub area: Decimal,
    pub cars: u32,
    pub motorbikes: u32,
}

pub fn fee_amount(
    fee: &Fee,
    usage: &ApartmentUsage,
    amounts: &FeeAmounts,
    rates: &VehicleRates,
) -> Decimal {
    match fee.fee_type {
        FeeType::DepartmentFee => fee.unit_price * usage.area,
        FeeType::VehicleFee => {
            rates.car * Decimal::from(usage.cars)
                + rates.motorbike * Decimal::from(usage.motorbikes)
        }
        FeeType::ContributionFund => amounts.get(&fee.id).copied().unwrap_or(Decimal::ZERO),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn sample_fee(id: i64, fee_type: FeeType, unit_price: Decimal) -> Fee {
        Fee {
            id,
            name: format!("{fee_type}"),
            description: None,
            fee_type,
            unit_price,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn usage(area: Decimal, cars: u32, motorbikes: u32) -> ApartmentUsage {
        ApartmentUsage {
            area,
            cars,
            motorbikes,
        }
    }

    #[test]
    fn department_fee_is_price_times_area() {
        let fee = sample_fee(1, FeeType::DepartmentFee, dec!(1000));
        let amount = fee_amount(
            &fee,
            &usage(dec!(50), 0, 0),
            &FeeAmounts::new(),
            &VehicleRates::default(),
        );
        assert_eq!(amount, dec!(50000));
    }

    #[test]
    fn vehicle_fee_uses_configured_rates() {
        let fee = sample_fee(2, FeeType::VehicleFee, dec!(1));
        let amount = fee_amount(
            &fee,
            &usage(dec!(50), 1, 2),
            &FeeAmounts::new(),
            &VehicleRates::default(),
        );
        assert_eq!(amount, dec!(1340000));

        let rates = VehicleRates {
            car: dec!(10),
            motorbike: dec!(1),
        };
        let amount = fee_amount(&fee, &usage(dec!(50), 2, 3), &FeeAmounts::new(), &rates);
        assert_eq!(amount, dec!(23));
    }

    #[test]
    fn contribution_fund_reads_stored_amount() {
        let fee = sample_fee(3, FeeType::ContributionFund, Decimal::ZERO);
        let amounts = FeeAmounts::from([(3, dec!(250000))]);
        let rates = VehicleRates::default();
        assert_eq!(
            fee_amount(&fee, &usage(dec!(50), 0, 0), &amounts, &rates),
            dec!(250000)
        );
        assert_eq!(
            fee_amount(&fee, &usage(dec!(50), 0, 0), &FeeAmounts::new(), &rates),
            Decimal::ZERO
        );
    }
}
