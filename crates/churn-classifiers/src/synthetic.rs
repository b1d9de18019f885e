//! Synthetic telecom customer generator.
//!
//! Every column is drawn independently from its own distribution; the only
//! relationship between columns is introduced later by the label heuristic in
//! [`crate::labels`]. `total_charges` is deliberately not derived from tenure
//! and monthly charges.

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{ChurnError, Result};

pub const TENURE_RANGE: (u32, u32) = (1, 72);
pub const MONTHLY_CHARGES_RANGE: (f64, f64) = (20.0, 120.0);
pub const TOTAL_CHARGES_RANGE: (f64, f64) = (100.0, 8000.0);

const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Contract {
    MonthToMonth,
    OneYear,
    TwoYear,
}

impl Contract {
    pub const WEIGHTS: [(Contract, f64); 3] = [
        (Contract::MonthToMonth, 0.5),
        (Contract::OneYear, 0.3),
        (Contract::TwoYear, 0.2),
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Contract::MonthToMonth => "Month-to-month",
            Contract::OneYear => "One year",
            Contract::TwoYear => "Two year",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    ElectronicCheck,
    MailedCheck,
    BankTransfer,
    CreditCard,
}

impl PaymentMethod {
    pub const WEIGHTS: [(PaymentMethod, f64); 4] = [
        (PaymentMethod::ElectronicCheck, 0.25),
        (PaymentMethod::MailedCheck, 0.25),
        (PaymentMethod::BankTransfer, 0.25),
        (PaymentMethod::CreditCard, 0.25),
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::ElectronicCheck => "Electronic check",
            PaymentMethod::MailedCheck => "Mailed check",
            PaymentMethod::BankTransfer => "Bank transfer",
            PaymentMethod::CreditCard => "Credit card",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InternetService {
    Dsl,
    FiberOptic,
    No,
}

impl InternetService {
    pub const WEIGHTS: [(InternetService, f64); 3] = [
        (InternetService::Dsl, 0.4),
        (InternetService::FiberOptic, 0.4),
        (InternetService::No, 0.2),
    ];

    pub fn label(&self) -> &'static str {
        match self {
            InternetService::Dsl => "DSL",
            InternetService::FiberOptic => "Fiber optic",
            InternetService::No => "No",
        }
    }
}

/// Yes/No add-on flag (tech support, online security).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    pub const WEIGHTS: [(YesNo, f64); 2] = [(YesNo::Yes, 0.3), (YesNo::No, 0.7)];

    pub fn label(&self) -> &'static str {
        match self {
            YesNo::Yes => "Yes",
            YesNo::No => "No",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    /// Months with the provider
    pub tenure: u32,
    pub monthly_charges: f64,
    pub total_charges: f64,
    pub contract: Contract,
    pub payment_method: PaymentMethod,
    pub internet_service: InternetService,
    pub tech_support: YesNo,
    pub online_security: YesNo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomerDataset {
    pub customers: Vec<Customer>,
}

impl CustomerDataset {
    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }
}

/// Draw `n_samples` values from a weighted table of categories.
fn sample_weighted<T: Copy, R: Rng>(
    rng: &mut R,
    column: &'static str,
    table: &[(T, f64)],
    n_samples: usize,
) -> Result<Vec<T>> {
    let total: f64 = table.iter().map(|(_, w)| *w).sum();
    if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(ChurnError::InvalidWeights {
            column,
            reason: format!("weights sum to {}", total),
        });
    }

    let dist = WeightedIndex::new(table.iter().map(|(_, w)| *w)).map_err(|e| {
        ChurnError::InvalidWeights {
            column,
            reason: e.to_string(),
        }
    })?;

    Ok((0..n_samples).map(|_| table[dist.sample(rng)].0).collect())
}

/// Generate `n_samples` synthetic customers from `seed`.
///
/// Columns are drawn one after the other (tenure, monthly charges, total
/// charges, contract, payment method, internet service, tech support, online
/// security) from a single seeded stream, so the same seed and size always
/// yield the same dataset.
pub fn generate_dataset(seed: u64, n_samples: usize) -> Result<CustomerDataset> {
    if n_samples == 0 {
        return Err(ChurnError::EmptyDataset);
    }

    let mut rng = StdRng::seed_from_u64(seed);

    let tenure: Vec<u32> = (0..n_samples)
        .map(|_| rng.gen_range(TENURE_RANGE.0..=TENURE_RANGE.1))
        .collect();
    let monthly_charges: Vec<f64> = (0..n_samples)
        .map(|_| rng.gen_range(MONTHLY_CHARGES_RANGE.0..MONTHLY_CHARGES_RANGE.1))
        .collect();
    let total_charges: Vec<f64> = (0..n_samples)
        .map(|_| rng.gen_range(TOTAL_CHARGES_RANGE.0..TOTAL_CHARGES_RANGE.1))
        .collect();
    let contract = sample_weighted(&mut rng, "contract", &Contract::WEIGHTS, n_samples)?;
    let payment_method =
        sample_weighted(&mut rng, "payment_method", &PaymentMethod::WEIGHTS, n_samples)?;
    let internet_service =
        sample_weighted(&mut rng, "internet_service", &InternetService::WEIGHTS, n_samples)?;
    let tech_support = sample_weighted(&mut rng, "tech_support", &YesNo::WEIGHTS, n_samples)?;
    let online_security =
        sample_weighted(&mut rng, "online_security", &YesNo::WEIGHTS, n_samples)?;

    let customers = (0..n_samples)
        .map(|i| Customer {
            tenure: tenure[i],
            monthly_charges: monthly_charges[i],
            total_charges: total_charges[i],
            contract: contract[i],
            payment_method: payment_method[i],
            internet_service: internet_service[i],
            tech_support: tech_support[i],
            online_security: online_security[i],
        })
        .collect::<Vec<_>>();

    log::debug!("Generated {} synthetic customers (seed {})", n_samples, seed);

    Ok(CustomerDataset { customers })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_weights_not_summing_to_one() {
        let mut rng = StdRng::seed_from_u64(0);
        let table = [(YesNo::Yes, 0.3), (YesNo::No, 0.6)];
        let err = sample_weighted(&mut rng, "tech_support", &table, 10).unwrap_err();
        assert!(matches!(err, ChurnError::InvalidWeights { column: "tech_support", .. }));
    }

    #[test]
    fn rejects_negative_weights() {
        let mut rng = StdRng::seed_from_u64(0);
        let table = [(YesNo::Yes, -0.5), (YesNo::No, 1.5)];
        assert!(sample_weighted(&mut rng, "online_security", &table, 10).is_err());
    }

    #[test]
    fn zero_weight_category_is_never_drawn() {
        let mut rng = StdRng::seed_from_u64(7);
        let table = [(YesNo::Yes, 0.0), (YesNo::No, 1.0)];
        let draws = sample_weighted(&mut rng, "tech_support", &table, 500).unwrap();
        assert!(draws.iter().all(|v| *v == YesNo::No));
    }

    #[test]
    fn weight_tables_sum_to_one() {
        let sums = [
            Contract::WEIGHTS.iter().map(|(_, w)| w).sum::<f64>(),
            PaymentMethod::WEIGHTS.iter().map(|(_, w)| w).sum::<f64>(),
            InternetService::WEIGHTS.iter().map(|(_, w)| w).sum::<f64>(),
            YesNo::WEIGHTS.iter().map(|(_, w)| w).sum::<f64>(),
        ];
        for s in sums {
            assert!((s - 1.0).abs() < 1e-12);
        }
    }
}
