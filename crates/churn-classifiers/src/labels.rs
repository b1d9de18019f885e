//! Churn label heuristic.
//!
//! A customer's churn probability is an additive risk score: a base rate plus
//! a fixed increment for each risk factor present, clipped into
//! `[0, MAX_CHURN_PROBABILITY]`. The label is one Bernoulli draw per customer.

use ndarray::Array1;
use rand::distributions::Distribution;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use statrs::distribution::Bernoulli;

use crate::error::{ChurnError, Result};
use crate::synthetic::{Contract, Customer, CustomerDataset, YesNo};

pub const BASE_CHURN_RISK: f64 = 0.1;
pub const MAX_CHURN_PROBABILITY: f64 = 0.9;

pub const SHORT_TENURE_MONTHS: u32 = 12;
pub const HIGH_MONTHLY_CHARGES: f64 = 80.0;

const SHORT_TENURE_RISK: f64 = 0.3;
const HIGH_CHARGES_RISK: f64 = 0.2;
const MONTH_TO_MONTH_RISK: f64 = 0.4;
const NO_TECH_SUPPORT_RISK: f64 = 0.15;
const NO_ONLINE_SECURITY_RISK: f64 = 0.1;

/// Sum of the base risk and every matching factor, before clipping.
pub fn raw_churn_risk(customer: &Customer) -> f64 {
    let mut risk = BASE_CHURN_RISK;
    if customer.tenure < SHORT_TENURE_MONTHS {
        risk += SHORT_TENURE_RISK;
    }
    if customer.monthly_charges > HIGH_MONTHLY_CHARGES {
        risk += HIGH_CHARGES_RISK;
    }
    if customer.contract == Contract::MonthToMonth {
        risk += MONTH_TO_MONTH_RISK;
    }
    if customer.tech_support == YesNo::No {
        risk += NO_TECH_SUPPORT_RISK;
    }
    if customer.online_security == YesNo::No {
        risk += NO_ONLINE_SECURITY_RISK;
    }
    risk
}

/// Probability used to draw the churn label, clipped to `[0, 0.9]`.
pub fn churn_probability(customer: &Customer) -> f64 {
    raw_churn_risk(customer).clamp(0.0, MAX_CHURN_PROBABILITY)
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabeledDataset {
    pub customers: Vec<Customer>,
    /// 1 for churned customers, 0 otherwise
    pub churn: Array1<usize>,
    pub churn_probability: Array1<f64>,
}

impl LabeledDataset {
    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    /// Fraction of customers labelled as churned.
    pub fn churn_rate(&self) -> f64 {
        if self.churn.is_empty() {
            return 0.0;
        }
        self.churn.iter().sum::<usize>() as f64 / self.churn.len() as f64
    }
}

/// Attach a churn label to every customer.
///
/// Uses its own seeded stream so label draws are reproducible independently
/// of the stream that generated the columns.
pub fn synthesize_labels(dataset: CustomerDataset, seed: u64) -> Result<LabeledDataset> {
    if dataset.is_empty() {
        return Err(ChurnError::EmptyDataset);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut churn = Vec::with_capacity(dataset.len());
    let mut probabilities = Vec::with_capacity(dataset.len());

    for customer in dataset.customers.iter() {
        let p = churn_probability(customer);
        let trial = Bernoulli::new(p).map_err(|_| ChurnError::InvalidProbability(p))?;
        let outcome: f64 = trial.sample(&mut rng);
        churn.push(if outcome > 0.5 { 1 } else { 0 });
        probabilities.push(p);
    }

    let labeled = LabeledDataset {
        customers: dataset.customers,
        churn: Array1::from_vec(churn),
        churn_probability: Array1::from_vec(probabilities),
    };

    log::debug!(
        "Synthesized churn labels for {} customers (churn rate {:.4})",
        labeled.len(),
        labeled.churn_rate()
    );

    Ok(labeled)
}

/// Coarse bucketing of a churn probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

impl RiskLevel {
    pub const HIGH_THRESHOLD: f64 = 0.7;
    pub const MEDIUM_THRESHOLD: f64 = 0.4;

    pub fn from_probability(p: f64) -> Self {
        if p > Self::HIGH_THRESHOLD {
            RiskLevel::High
        } else if p > Self::MEDIUM_THRESHOLD {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::High => "High",
            RiskLevel::Medium => "Medium",
            RiskLevel::Low => "Low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskTierSummary {
    pub level: RiskLevel,
    pub customers: usize,
    pub churned: usize,
}

impl RiskTierSummary {
    pub fn churn_rate(&self) -> f64 {
        if self.customers == 0 {
            0.0
        } else {
            self.churned as f64 / self.customers as f64
        }
    }
}

/// Customers and observed churners per risk tier, ordered High, Medium, Low.
pub fn risk_tier_summary(dataset: &LabeledDataset) -> Vec<RiskTierSummary> {
    let mut tiers = [RiskLevel::High, RiskLevel::Medium, RiskLevel::Low].map(|level| {
        RiskTierSummary {
            level,
            customers: 0,
            churned: 0,
        }
    });

    for (p, label) in dataset.churn_probability.iter().zip(dataset.churn.iter()) {
        let idx = match RiskLevel::from_probability(*p) {
            RiskLevel::High => 0,
            RiskLevel::Medium => 1,
            RiskLevel::Low => 2,
        };
        tiers[idx].customers += 1;
        tiers[idx].churned += *label;
    }

    tiers.to_vec()
}
