//! Invoice domain entities

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Manual amounts per fee id, used by contribution funds.
pub type FeeAmounts = BTreeMap<i64, Decimal>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum PaymentStatus {
    Unpaid,
    Paid,
}

impl Default for PaymentStatus {
    fn default() -> Self {
        Self::Unpaid
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unpaid => write!(f, "Unpaid"),
            Self::Paid => write!(f, "Paid"),
        }
    }
}

/// A billing run, identified by a caller-chosen code such as `INV001`.
#[derive(Debug, Clone, PartialEq)]
pub struct Invoice {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// False only for legacy rows; the API deletes invoices outright.
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payment state of one invoice for one apartment.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceApartment {
    pub id: i64,
    pub invoice_id: String,
    pub apartment_id: i64,
    pub payment_status: PaymentStatus,
    pub fee_amounts: FeeAmounts,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InvoiceApartment {
    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }

    pub fn mark_paid(&mut self) {
        self.payment_status = PaymentStatus::Paid;
        self.updated_at = Utc::now();
    }

    /// Merge manual amounts into the existing ones, overwriting per fee.
    pub fn set_amounts(&mut self, amounts: &FeeAmounts) {
        for (fee_id, amount) in amounts {
            self.fee_amounts.insert(*fee_id, *amount);
        }
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone)]
pub struct NewInvoiceApartment {
    pub invoice_id: String,
    pub apartment_id: i64,
}

#[derive(Debug, Clone, Default)]
pub struct InvoiceFilter {
    pub name: Option<String>,
    pub is_active: Option<bool>,
}

impl InvoiceFilter {
    pub fn matches(&self, invoice: &Invoice) -> bool {
        if let Some(name) = &self.name {
            if !invoice.name.contains(name.as_str()) {
                return false;
            }
        }
        self.is_active.map_or(true, |a| invoice.is_active == a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_link() -> InvoiceApartment {
        InvoiceApartment {
            id: 1,
            invoice_id: "INV001".into(),
            apartment_id: 101,
            payment_status: PaymentStatus::Unpaid,
            fee_amounts: FeeAmounts::from([(3, dec!(100000))]),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn set_amounts_merges() {
        let mut link = sample_link();
        link.set_amounts(&FeeAmounts::from([(4, dec!(5000))]));
        assert_eq!(link.fee_amounts.get(&3), Some(&dec!(100000)));
        assert_eq!(link.fee_amounts.get(&4), Some(&dec!(5000)));

        link.set_amounts(&FeeAmounts::from([(3, dec!(1))]));
        assert_eq!(link.fee_amounts.get(&3), Some(&dec!(1)));
    }

    #[test]
    fn mark_paid() {
        let mut link = sample_link();
        assert!(!link.is_paid());
        link.mark_paid();
        assert!(link.is_paid());
    }
}
