//! Builder utilities for configuring the hierarchy pipeline.
//!
//! Collects thresholds, resolution parameters and the hierarchy name, and
//! validates them once before constructing a [`Nestor`].

use crate::{
    Result,
    annotate::DEFAULT_HIERARCHY_NAME,
    cluster::ResolutionParams,
    hierarchy::Thresholds,
    nestor::Nestor,
};

/// Configures and constructs [`Nestor`] instances.
///
/// Ratio thresholds are only checked by [`NestorBuilder::build`], so setters
/// can be chained in any order.
///
/// # Examples
/// ```
/// use nestor_core::NestorBuilder;
///
/// let nestor = NestorBuilder::new()
///     .with_containment_threshold(0.8)
///     .with_min_system_size(6)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(nestor.thresholds().containment(), 0.8);
/// assert_eq!(nestor.thresholds().min_system_size(), 6);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NestorBuilder {
    containment: f64,
    jaccard: f64,
    min_diff: usize,
    min_system_size: usize,
    params: ResolutionParams,
    hierarchy_name: String,
}

impl Default for NestorBuilder {
    fn default() -> Self {
        let thresholds = Thresholds::default();
        Self {
            containment: thresholds.containment(),
            jaccard: thresholds.jaccard(),
            min_diff: thresholds.min_diff(),
            min_system_size: thresholds.min_system_size(),
            params: ResolutionParams::default(),
            hierarchy_name: DEFAULT_HIERARCHY_NAME.to_owned(),
        }
    }
}

impl NestorBuilder {
    /// Creates a builder populated with default parameters.
    ///
    /// # Examples
    /// ```
    /// use nestor_core::NestorBuilder;
    ///
    /// let builder = NestorBuilder::new();
    /// assert_eq!(builder.containment_threshold(), 0.75);
    /// assert_eq!(builder.jaccard_threshold(), 0.9);
    /// assert_eq!(builder.resolution_params().algorithm, "leiden");
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies every field of an already validated [`Thresholds`].
    #[must_use]
    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.containment = thresholds.containment();
        self.jaccard = thresholds.jaccard();
        self.min_diff = thresholds.min_diff();
        self.min_system_size = thresholds.min_system_size();
        self
    }

    /// Overrides the minimum containment index of a retained edge.
    #[must_use]
    pub fn with_containment_threshold(mut self, value: f64) -> Self {
        self.containment = value;
        self
    }

    /// Returns the configured containment threshold.
    #[must_use]
    pub fn containment_threshold(&self) -> f64 {
        self.containment
    }

    /// Overrides the jaccard index at which near-duplicates merge.
    #[must_use]
    pub fn with_jaccard_threshold(mut self, value: f64) -> Self {
        self.jaccard = value;
        self
    }

    /// Returns the configured jaccard threshold.
    #[must_use]
    pub fn jaccard_threshold(&self) -> f64 {
        self.jaccard
    }

    /// Overrides the minimum member difference between parent and child.
    ///
    /// # Examples
    /// ```
    /// use nestor_core::NestorBuilder;
    ///
    /// let builder = NestorBuilder::new().with_min_diff(3);
    /// assert_eq!(builder.min_diff(), 3);
    /// ```
    #[must_use]
    pub fn with_min_diff(mut self, value: usize) -> Self {
        self.min_diff = value;
        self
    }

    /// Returns the configured minimum difference.
    #[must_use]
    pub fn min_diff(&self) -> usize {
        self.min_diff
    }

    /// Overrides the minimum number of members a system keeps.
    #[must_use]
    pub fn with_min_system_size(mut self, value: usize) -> Self {
        self.min_system_size = value;
        self
    }

    /// Returns the configured minimum system size.
    #[must_use]
    pub fn min_system_size(&self) -> usize {
        self.min_system_size
    }

    /// Sets the parameters forwarded to the cluster producer.
    ///
    /// # Examples
    /// ```
    /// use nestor_core::{NestorBuilder, ResolutionParams};
    ///
    /// let params = ResolutionParams { algorithm: "louvain".into(), max_resolution: 40.0, k: 5 };
    /// let builder = NestorBuilder::new().with_resolution_params(params.clone());
    /// assert_eq!(builder.resolution_params(), &params);
    /// ```
    #[must_use]
    pub fn with_resolution_params(mut self, params: ResolutionParams) -> Self {
        self.params = params;
        self
    }

    /// Returns the parameters forwarded to the cluster producer.
    #[must_use]
    pub fn resolution_params(&self) -> &ResolutionParams {
        &self.params
    }

    /// Overrides the `name` attribute of the emitted hierarchy.
    #[must_use]
    pub fn with_hierarchy_name(mut self, name: impl Into<String>) -> Self {
        self.hierarchy_name = name.into();
        self
    }

    /// Returns the `name` attribute of the emitted hierarchy.
    #[must_use]
    pub fn hierarchy_name(&self) -> &str {
        &self.hierarchy_name
    }

    /// Validates the configuration and constructs a [`Nestor`] instance.
    ///
    /// # Errors
    /// Returns [`crate::NestorError::InvalidThreshold`] when either ratio is
    /// not finite or lies outside `[0, 1]`.
    ///
    /// # Examples
    /// ```
    /// use nestor_core::{NestorBuilder, NestorErrorCode};
    ///
    /// let err = NestorBuilder::new()
    ///     .with_jaccard_threshold(1.2)
    ///     .build()
    ///     .expect_err("ratios above one are rejected");
    /// assert_eq!(err.code(), NestorErrorCode::InvalidThreshold);
    /// ```
    pub fn build(self) -> Result<Nestor> {
        let thresholds = Thresholds::new(
            self.containment,
            self.jaccard,
            self.min_diff,
            self.min_system_size,
        )?;
        Ok(Nestor::new(thresholds, self.params, self.hierarchy_name))
    }
}
