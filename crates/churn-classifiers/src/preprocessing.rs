//! Feature encoding and scaling.
//!
//! Provides a `LabelEncoder` for the categorical customer columns, the
//! `encode_features` step that turns a labelled dataset into the numeric
//! design matrix, and a `StandardScaler` for mean/std standardization.

use std::collections::BTreeSet;

use ndarray::{Array1, Array2, Axis};

use crate::data_handling::{EncodedDataset, FEATURE_NAMES};
use crate::error::{ChurnError, Result};
use crate::labels::LabeledDataset;

/// Maps each distinct category of one column to a stable integer code.
///
/// Codes follow the lexicographic order of the observed values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelEncoder {
    column: String,
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn fit<S: AsRef<str>>(column: &str, values: &[S]) -> Result<Self> {
        if values.is_empty() {
            return Err(ChurnError::EmptyDataset);
        }
        let classes: BTreeSet<&str> = values.iter().map(|v| v.as_ref()).collect();
        Ok(LabelEncoder {
            column: column.to_string(),
            classes: classes.into_iter().map(str::to_string).collect(),
        })
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn encode(&self, value: &str) -> Result<usize> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(value))
            .map_err(|_| ChurnError::UnseenCategory {
                column: self.column.clone(),
                value: value.to_string(),
            })
    }

    pub fn transform<S: AsRef<str>>(&self, values: &[S]) -> Result<Vec<usize>> {
        values.iter().map(|v| self.encode(v.as_ref())).collect()
    }

    pub fn fit_transform<S: AsRef<str>>(column: &str, values: &[S]) -> Result<(Self, Vec<usize>)> {
        let encoder = Self::fit(column, values)?;
        let codes = encoder.transform(values)?;
        Ok((encoder, codes))
    }

    pub fn inverse_transform(&self, code: usize) -> Option<&str> {
        self.classes.get(code).map(String::as_str)
    }
}

/// One independently fitted encoder per categorical column.
#[derive(Clone, Debug)]
pub struct CategoricalEncoders {
    pub contract: LabelEncoder,
    pub payment_method: LabelEncoder,
    pub internet_service: LabelEncoder,
    pub tech_support: LabelEncoder,
    pub online_security: LabelEncoder,
}

/// Build the numeric design matrix.
///
/// The encoders are fitted on the whole dataset, before any train/test split,
/// so both partitions share one code space.
pub fn encode_features(dataset: &LabeledDataset) -> Result<(EncodedDataset, CategoricalEncoders)> {
    let customers = &dataset.customers;
    if customers.is_empty() {
        return Err(ChurnError::EmptyDataset);
    }
    if dataset.churn.len() != customers.len() {
        return Err(ChurnError::ShapeMismatch {
            expected: customers.len(),
            found: dataset.churn.len(),
        });
    }

    let contract: Vec<&str> = customers.iter().map(|c| c.contract.label()).collect();
    let payment: Vec<&str> = customers.iter().map(|c| c.payment_method.label()).collect();
    let internet: Vec<&str> = customers.iter().map(|c| c.internet_service.label()).collect();
    let tech: Vec<&str> = customers.iter().map(|c| c.tech_support.label()).collect();
    let security: Vec<&str> = customers.iter().map(|c| c.online_security.label()).collect();

    let (le_contract, contract_codes) = LabelEncoder::fit_transform("contract", &contract)?;
    let (le_payment, payment_codes) = LabelEncoder::fit_transform("payment_method", &payment)?;
    let (le_internet, internet_codes) = LabelEncoder::fit_transform("internet_service", &internet)?;
    let (le_tech, tech_codes) = LabelEncoder::fit_transform("tech_support", &tech)?;
    let (le_security, security_codes) = LabelEncoder::fit_transform("online_security", &security)?;

    let n_features = FEATURE_NAMES.len();
    let mut data = Vec::with_capacity(customers.len() * n_features);
    for (i, c) in customers.iter().enumerate() {
        data.extend_from_slice(&[
            c.tenure as f64,
            c.monthly_charges,
            c.total_charges,
            contract_codes[i] as f64,
            payment_codes[i] as f64,
            internet_codes[i] as f64,
            tech_codes[i] as f64,
            security_codes[i] as f64,
        ]);
    }

    let found = data.len();
    let x = Array2::from_shape_vec((customers.len(), n_features), data).map_err(|_| {
        ChurnError::ShapeMismatch {
            expected: customers.len() * n_features,
            found,
        }
    })?;

    let encoded = EncodedDataset {
        x,
        y: dataset.churn.clone(),
        feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
    };

    let encoders = CategoricalEncoders {
        contract: le_contract,
        payment_method: le_payment,
        internet_service: le_internet,
        tech_support: le_tech,
        online_security: le_security,
    };

    Ok((encoded, encoders))
}

/// Standard scaler (per-column mean/std).
#[derive(Clone, Debug)]
pub struct StandardScaler {
    pub mean: Array1<f64>,
    pub std: Array1<f64>,
}

impl StandardScaler {
    /// Minimum stddev to avoid division by zero when transforming.
    const MIN_STD: f64 = 1e-6;

    /// Fit on a matrix where rows are samples and columns are features.
    pub fn fit(x: &Array2<f64>) -> Result<Self> {
        let (nrows, ncols) = x.dim();
        if nrows == 0 || ncols == 0 {
            return Err(ChurnError::EmptyDataset);
        }

        let mean = x.mean_axis(Axis(0)).ok_or(ChurnError::EmptyDataset)?;
        let std = x.std_axis(Axis(0), 0.0).mapv(|s| s.max(Self::MIN_STD));

        log::debug!("Fitted scaler on {} rows: mean={:?} std={:?}", nrows, mean, std);

        Ok(StandardScaler { mean, std })
    }

    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        if x.ncols() != self.mean.len() {
            return Err(ChurnError::ShapeMismatch {
                expected: self.mean.len(),
                found: x.ncols(),
            });
        }
        Ok((x - &self.mean) / &self.std)
    }

    pub fn fit_transform(x: &Array2<f64>) -> Result<(Self, Array2<f64>)> {
        let scaler = Self::fit(x)?;
        let scaled = scaler.transform(x)?;
        Ok((scaler, scaled))
    }
}
