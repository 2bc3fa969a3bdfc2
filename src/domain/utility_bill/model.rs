use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::invoice::PaymentStatus;

/// Electricity, water and internet charges of one apartment for one period.
#[derive(Debug, Clone, PartialEq)]
pub struct UtilityBill {
    pub id: i64,
    pub apartment_id: i64,
    /// Billing period label, e.g. "2024-05"
    pub name: String,
    pub electricity: Decimal,
    pub water: Decimal,
    pub internet: Decimal,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

impl UtilityBill {
    pub fn total(&self) -> Decimal {
        self.electricity + self.water + self.internet
    }
}

/// One imported row. New bills always start unpaid.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUtilityBill {
    pub apartment_id: i64,
    pub name: String,
    pub electricity: Decimal,
    pub water: Decimal,
    pub internet: Decimal,
}

#[derive(Debug, Clone, Default)]
pub struct UtilityBillFilter {
    pub apartment_id: Option<i64>,
    pub name: Option<String>,
    pub payment_status: Option<PaymentStatus>,
}

impl UtilityBillFilter {
    pub fn matches(&self, bill: &UtilityBill) -> bool {
        if let Some(name) = &self.name {
            if !bill.name.contains(name.as_str()) {
                return false;
            }
        }
        self.apartment_id.map_or(true, |a| bill.apartment_id == a)
            && self.payment_status.map_or(true, |s| bill.payment_status == s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn total_sums_all_services() {
        let bill = UtilityBill {
            id: 1,
            apartment_id: 101,
            name: "2024-05".into(),
            electricity: dec!(350000.5),
            water: dec!(120000),
            internet: dec!(200000),
            payment_status: PaymentStatus::Unpaid,
            created_at: Utc::now(),
        };
        assert_eq!(bill.total(), dec!(670000.5));

        let unpaid = UtilityBillFilter {
            payment_status: Some(PaymentStatus::Unpaid),
            apartment_id: Some(101),
            ..Default::default()
        };
        assert!(unpaid.matches(&bill));
    }
}
