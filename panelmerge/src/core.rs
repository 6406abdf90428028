use std::collections::HashSet;
use std::sync::Arc;

use panelmerge_core::{
    FillMode, IdentifierResolver, MismatchPolicy, PanelConfig, PanelError, SchemaConfig,
    TruncateResolver, VerifyConfig,
};

/// Orchestrator that aligns a securities panel with fundamentals and verifies the result.
pub struct PanelMerge {
    pub(crate) cfg: PanelConfig,
    pub(crate) verify_cfg: VerifyConfig,
    pub(crate) resolver: Arc<dyn IdentifierResolver>,
}

impl std::fmt::Debug for PanelMerge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelMerge")
            .field("cfg", &self.cfg)
            .field("verify_cfg", &self.verify_cfg)
            .field("resolver", &self.resolver.name())
            .finish()
    }
}

/// Builder for constructing a `PanelMerge` orchestrator with custom configuration.
pub struct PanelMergeBuilder {
    cfg: PanelConfig,
    verify_cfg: VerifyConfig,
    resolver: Option<Arc<dyn IdentifierResolver>>,
}

impl Default for PanelMergeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PanelMergeBuilder {
    /// Create a new builder with the CRSP/Compustat defaults.
    ///
    /// Behavior:
    /// - Keys on `cusip`, with `caldt` and `datadate` renamed to `date`.
    /// - Rolls `chq`, `actq`, `atq` down forward then backward within each identifier.
    /// - Drops `curcdq`, `datafmt`, `indfmt`, `consol` from the output.
    /// - Truncates fundamentals identifiers to 8 characters unless a resolver is set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cfg: PanelConfig::default(),
            verify_cfg: VerifyConfig::default(),
            resolver: None,
        }
    }

    /// Replace the whole pipeline configuration.
    #[must_use]
    pub fn config(mut self, cfg: PanelConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Replace the key column names.
    #[must_use]
    pub fn schema(mut self, schema: SchemaConfig) -> Self {
        self.cfg.schema = schema;
        self
    }

    /// Set the fundamental fields rolled down across securities rows.
    #[must_use]
    pub fn roll_down<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cfg.roll_down = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Set the columns removed from the output.
    #[must_use]
    pub fn drop_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cfg.drop = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Set the fill mode for every roll-down field without an override.
    ///
    /// `ForwardOnly` leaves values before an identifier's first report null;
    /// `ForwardThenBackward` back-propagates the first report, which is
    /// look-ahead for backtests.
    #[must_use]
    pub const fn fill_mode(mut self, mode: FillMode) -> Self {
        self.cfg.fill_mode = mode;
        self
    }

    /// Override the fill mode for one roll-down field.
    #[must_use]
    pub fn fill_override(mut self, field: impl Into<String>, mode: FillMode) -> Self {
        self.cfg.fill_overrides.insert(field.into(), mode);
        self
    }

    /// Set the truncation width used by the default resolver.
    #[must_use]
    pub const fn identifier_width(mut self, width: usize) -> Self {
        self.cfg.identifier_width = width;
        self
    }

    /// Resolve fundamentals identifiers with `resolver` instead of truncation.
    #[must_use]
    pub fn resolver(mut self, resolver: Arc<dyn IdentifierResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Replace the verifier configuration.
    #[must_use]
    pub fn verify_config(mut self, cfg: VerifyConfig) -> Self {
        self.verify_cfg = cfg;
        self
    }

    /// Build the `PanelMerge` orchestrator.
    ///
    /// # Errors
    /// Returns `InvalidArg` if a column name is empty, the suffixes are equal, a
    /// field is both rolled down and dropped, a fill override names a field that
    /// is not rolled down, the identifier width is zero, or the verify policy is
    /// `CollectUpTo(0)`.
    pub fn build(self) -> Result<PanelMerge, PanelError> {
        validate(&self.cfg, &self.verify_cfg)?;
        let resolver = self.resolver.unwrap_or_else(|| {
            Arc::new(TruncateResolver::new(self.cfg.identifier_width)) as Arc<dyn IdentifierResolver>
        });
        Ok(PanelMerge {
            cfg: self.cfg,
            verify_cfg: self.verify_cfg,
            resolver,
        })
    }
}

fn validate(cfg: &PanelConfig, verify_cfg: &VerifyConfig) -> Result<(), PanelError> {
    let s = &cfg.schema;
    let names = [
        ("schema.identifier", &s.identifier),
        ("schema.security_date", &s.security_date),
        ("schema.fundamental_date", &s.fundamental_date),
        ("schema.date", &s.date),
        ("schema.security_return", &s.security_return),
        ("verify.identifier", &verify_cfg.identifier),
        ("verify.field_a", &verify_cfg.field_a),
        ("verify.field_b", &verify_cfg.field_b),
    ];
    if let Some((label, _)) = names.iter().find(|(_, v)| v.trim().is_empty()) {
        return Err(PanelError::InvalidArg(format!("{label} must not be empty")));
    }
    if let Some(f) = cfg.roll_down.iter().chain(&cfg.drop).find(|f| f.trim().is_empty()) {
        return Err(PanelError::InvalidArg(format!(
            "empty column name '{f}' in roll_down or drop"
        )));
    }
    if s.suffixes.0 == s.suffixes.1 {
        return Err(PanelError::InvalidArg(format!(
            "suffixes must differ, both are '{}'",
            s.suffixes.0
        )));
    }
    let rolled: HashSet<&str> = cfg.roll_down.iter().map(String::as_str).collect();
    if let Some(f) = cfg.drop.iter().find(|f| rolled.contains(f.as_str())) {
        return Err(PanelError::InvalidArg(format!(
            "'{f}' is both rolled down and dropped"
        )));
    }
    if let Some(f) = cfg.fill_overrides.keys().find(|f| !rolled.contains(f.as_str())) {
        return Err(PanelError::InvalidArg(format!(
            "fill override for '{f}', which is not a roll-down field"
        )));
    }
    if verify_cfg.policy == MismatchPolicy::CollectUpTo(0) {
        return Err(PanelError::InvalidArg(
            "verify.policy collect_up_to must be at least 1".to_string(),
        ));
    }
    if cfg.identifier_width == 0 {
        return Err(PanelError::InvalidArg(
            "identifier_width must be at least 1".to_string(),
        ));
    }
    Ok(())
}

impl PanelMerge {
    /// Start building a new `PanelMerge` instance.
    ///
    /// ```rust,ignore
    /// use panelmerge::{FillMode, PanelMerge};
    ///
    /// let pm = PanelMerge::builder()
    ///     .roll_down(["chq", "actq", "atq"])
    ///     .fill_mode(FillMode::ForwardOnly)
    ///     .build()?;
    /// let outcome = pm.merge(&securities, &fundamentals)?;
    /// ```
    #[must_use]
    pub fn builder() -> PanelMergeBuilder {
        PanelMergeBuilder::new()
    }

    /// Active pipeline configuration.
    #[must_use]
    pub const fn config(&self) -> &PanelConfig {
        &self.cfg
    }

    /// Active verifier configuration.
    #[must_use]
    pub const fn verify_config(&self) -> &VerifyConfig {
        &self.verify_cfg
    }

    /// Name of the identifier resolver in use.
    #[must_use]
    pub fn resolver_name(&self) -> &'static str {
        self.resolver.name()
    }
}
