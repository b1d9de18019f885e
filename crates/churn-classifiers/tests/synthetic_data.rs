//! Integration tests for the synthetic generator and the churn label heuristic.

use churn_classifiers::error::ChurnError;
use churn_classifiers::labels::{
    churn_probability, raw_churn_risk, risk_tier_summary, synthesize_labels, RiskLevel,
    MAX_CHURN_PROBABILITY,
};
use churn_classifiers::synthetic::{
    generate_dataset, Contract, Customer, CustomerDataset, InternetService, PaymentMethod, YesNo,
};

fn customer(
    tenure: u32,
    monthly: f64,
    contract: Contract,
    tech: YesNo,
    security: YesNo,
) -> Customer {
    Customer {
        tenure,
        monthly_charges: monthly,
        total_charges: 1500.0,
        contract,
        payment_method: PaymentMethod::CreditCard,
        internet_service: InternetService::Dsl,
        tech_support: tech,
        online_security: security,
    }
}

// ---------------------------------------------------------------------------
// Generator
// ---------------------------------------------------------------------------

#[test]
fn generated_columns_stay_in_range() {
    let data = generate_dataset(42, 5000).unwrap();
    assert_eq!(data.len(), 5000);
    for c in &data.customers {
        assert!((1..=72).contains(&c.tenure), "tenure {}", c.tenure);
        assert!((20.0..=120.0).contains(&c.monthly_charges));
        assert!((100.0..=8000.0).contains(&c.total_charges));
    }
}

#[test]
fn generator_is_deterministic_per_seed() {
    let a = generate_dataset(42, 300).unwrap();
    let b = generate_dataset(42, 300).unwrap();
    let c = generate_dataset(43, 300).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn empty_dataset_is_rejected() {
    assert!(matches!(generate_dataset(42, 0), Err(ChurnError::EmptyDataset)));
}

fn share(data: &CustomerDataset, pred: impl Fn(&Customer) -> bool) -> f64 {
    data.customers.iter().filter(|c| pred(c)).count() as f64 / data.len() as f64
}

#[test]
fn categorical_frequencies_follow_weights() {
    let data = generate_dataset(42, 5000).unwrap();

    assert!((share(&data, |c| c.contract == Contract::MonthToMonth) - 0.5).abs() < 0.03);
    assert!((share(&data, |c| c.contract == Contract::TwoYear) - 0.2).abs() < 0.03);
    assert!((share(&data, |c| c.internet_service == InternetService::No) - 0.2).abs() < 0.03);
    assert!((share(&data, |c| c.payment_method == PaymentMethod::MailedCheck) - 0.25).abs() < 0.03);
    assert!((share(&data, |c| c.tech_support == YesNo::No) - 0.7).abs() < 0.03);
    assert!((share(&data, |c| c.online_security == YesNo::Yes) - 0.3).abs() < 0.03);
}

// ---------------------------------------------------------------------------
// Label heuristic
// ---------------------------------------------------------------------------

#[test]
fn all_risk_factors_clip_to_max_probability() {
    let c = customer(3, 95.0, Contract::MonthToMonth, YesNo::No, YesNo::No);
    assert!((raw_churn_risk(&c) - 1.25).abs() < 1e-12);
    assert_eq!(churn_probability(&c), MAX_CHURN_PROBABILITY);
}

#[test]
fn no_risk_factors_is_base_rate() {
    let c = customer(24, 50.0, Contract::TwoYear, YesNo::Yes, YesNo::Yes);
    assert_eq!(raw_churn_risk(&c), 0.1);
    assert_eq!(churn_probability(&c), 0.1);
}

#[test]
fn thresholds_are_strict() {
    // tenure == 12 and monthly == 80 do not count as risk factors
    let c = customer(12, 80.0, Contract::OneYear, YesNo::Yes, YesNo::Yes);
    assert_eq!(raw_churn_risk(&c), 0.1);

    let c = customer(11, 80.01, Contract::OneYear, YesNo::Yes, YesNo::Yes);
    assert!((raw_churn_risk(&c) - 0.6).abs() < 1e-12);
}

#[test]
fn individual_factor_increments() {
    let base = customer(24, 50.0, Contract::OneYear, YesNo::Yes, YesNo::Yes);
    let cases = [
        (customer(24, 50.0, Contract::MonthToMonth, YesNo::Yes, YesNo::Yes), 0.4),
        (customer(24, 50.0, Contract::OneYear, YesNo::No, YesNo::Yes), 0.15),
        (customer(24, 50.0, Contract::OneYear, YesNo::Yes, YesNo::No), 0.1),
    ];
    for (c, delta) in cases {
        assert!((raw_churn_risk(&c) - raw_churn_risk(&base) - delta).abs() < 1e-12);
    }
}

#[test]
fn labels_are_binary_and_deterministic() {
    let a = synthesize_labels(generate_dataset(42, 2000).unwrap(), 43).unwrap();
    let b = synthesize_labels(generate_dataset(42, 2000).unwrap(), 43).unwrap();
    assert_eq!(a, b);
    assert!(a.churn.iter().all(|&v| v == 0 || v == 1));
    assert!(a.churn_probability.iter().all(|&p| (0.0..=0.9).contains(&p)));
}

#[test]
fn churn_rate_tracks_mean_probability() {
    let labeled = synthesize_labels(generate_dataset(42, 5000).unwrap(), 43).unwrap();
    let mean_p = labeled.churn_probability.mean().unwrap();
    assert!((labeled.churn_rate() - mean_p).abs() < 0.03);
}

#[test]
fn labelling_an_empty_dataset_fails() {
    let empty = CustomerDataset { customers: vec![] };
    assert!(synthesize_labels(empty, 1).is_err());
}

// ---------------------------------------------------------------------------
// Risk tiers
// ---------------------------------------------------------------------------

#[test]
fn risk_level_thresholds() {
    assert_eq!(RiskLevel::from_probability(0.9), RiskLevel::High);
    assert_eq!(RiskLevel::from_probability(0.7), RiskLevel::Medium);
    assert_eq!(RiskLevel::from_probability(0.41), RiskLevel::Medium);
    assert_eq!(RiskLevel::from_probability(0.4), RiskLevel::Low);
    assert_eq!(RiskLevel::from_probability(0.1), RiskLevel::Low);
}

#[test]
fn risk_tiers_cover_every_customer() {
    let labeled = synthesize_labels(generate_dataset(42, 1000).unwrap(), 43).unwrap();
    let tiers = risk_tier_summary(&labeled);
    assert_eq!(
        tiers.iter().map(|t| t.level).collect::<Vec<_>>(),
        vec![RiskLevel::High, RiskLevel::Medium, RiskLevel::Low]
    );
    assert_eq!(tiers.iter().map(|t| t.customers).sum::<usize>(), 1000);
    assert_eq!(
        tiers.iter().map(|t| t.churned).sum::<usize>(),
        labeled.churn.iter().sum::<usize>()
    );
    // higher tiers churn more
    assert!(tiers[0].churn_rate() > tiers[2].churn_rate());
}
