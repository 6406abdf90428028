use panelmerge_core::{
    FillMode, InputKind, MergeReport, MergeStats, MismatchReviewer, Panel, PanelError,
    PanelSink, PanelSource, PolicyReviewer, Stage, Table, VerificationReport, align, date_set,
    normalize_identifiers, reduce, roll_down, verify_with_reviewer,
};

use crate::core::PanelMerge;

/// Merged panel together with the run summary.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// Final panel, sorted by (identifier, date).
    pub panel: Panel,
    /// Per-stage counts and non-fatal warnings.
    pub report: MergeReport,
}

impl MergeOutcome {
    /// Flatten the panel into the persisted table layout.
    #[must_use]
    pub fn to_table(&self) -> Table {
        self.panel.to_table()
    }
}

fn tag_load_err(input: InputKind, e: PanelError) -> PanelError {
    match e {
        e @ PanelError::MissingInput { .. } => e,
        other => PanelError::missing_input(input, other.to_string()),
    }
}

impl PanelMerge {
    /// Run the transform chain over two in-memory tables.
    ///
    /// Stages, in order: normalize fundamentals identifiers, outer-join on
    /// (identifier, date), roll the configured fields down within each identifier,
    /// then keep only securities dates with a non-null return and remove the drop
    /// columns. Roll-down fields are looked up under their merged names, so a
    /// field present in both inputs resolves to its suffixed fundamentals column.
    /// A drop field is removed from whichever inputs carry it.
    ///
    /// # Errors
    /// Returns the first stage failure (`Schema` or `Data`); no partial panel is
    /// produced.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "panelmerge::merge",
            skip_all,
            fields(
                securities = securities.len(),
                fundamentals = fundamentals.len(),
                resolver = self.resolver.name(),
            ),
        )
    )]
    pub fn merge(&self, securities: &Table, fundamentals: &Table) -> Result<MergeOutcome, PanelError> {
        let schema = &self.cfg.schema;

        let fundamentals = normalize_identifiers(
            fundamentals,
            &schema.identifier,
            Some(schema.fundamental_date.as_str()),
            &*self.resolver,
        )?;
        let security_dates = date_set(securities, Stage::Align, &schema.security_date)?;

        let aligned = align(securities, &fundamentals, schema)?;
        let aligned_rows = aligned.panel.len();

        let fields: Vec<(String, FillMode)> = self
            .cfg
            .roll_down
            .iter()
            .map(|f| {
                aligned
                    .column_name(InputKind::Fundamentals, f)
                    .map(|merged| (merged.to_string(), self.cfg.fill_mode_for(f)))
                    .ok_or_else(|| PanelError::schema(Stage::Fill, f.as_str()))
            })
            .collect::<Result<_, _>>()?;

        let return_column = aligned
            .column_name(InputKind::Securities, &schema.security_return)
            .ok_or_else(|| PanelError::schema(Stage::Reduce, schema.security_return.as_str()))?
            .to_string();
        let mut drop: Vec<String> = Vec::with_capacity(self.cfg.drop.len());
        for d in &self.cfg.drop {
            let found = drop.len();
            for input in [InputKind::Securities, InputKind::Fundamentals] {
                if let Some(merged) = aligned.column_name(input, d) {
                    drop.push(merged.to_string());
                }
            }
            if drop.len() == found {
                return Err(PanelError::schema(Stage::Reduce, d.as_str()));
            }
        }

        let filled = roll_down(aligned.panel, &fields)?;
        let reduced = reduce(filled, &security_dates, &return_column, &drop)?;

        let stats = MergeStats {
            security_rows: securities.len(),
            fundamental_rows: fundamentals.len(),
            skipped_keys: aligned.skipped_keys,
            duplicate_keys: aligned.duplicate_keys,
            aligned_rows,
            dropped_foreign_dates: reduced.dropped_foreign_dates,
            dropped_null_returns: reduced.dropped_null_returns,
            output_rows: reduced.panel.len(),
        };

        #[cfg(feature = "tracing")]
        tracing::info!(
            output_rows = stats.output_rows,
            aligned_rows = stats.aligned_rows,
            warnings = aligned.warnings.len(),
            "merged panel built"
        );

        Ok(MergeOutcome {
            panel: reduced.panel,
            report: MergeReport {
                stats,
                warnings: aligned.warnings,
            },
        })
    }

    /// Load both inputs from `source`, merge them, and hand the result to `sink`.
    ///
    /// Both inputs are loaded before any transform runs; a load failure is
    /// reported as `MissingInput` naming the input. The sink is called exactly
    /// once, and only if every stage succeeded.
    ///
    /// # Errors
    /// - `MissingInput` if either input cannot be loaded.
    /// - Any stage error from [`PanelMerge::merge`].
    /// - The sink's error if writing fails.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "panelmerge::run",
            skip_all,
            fields(source = source.name(), sink = sink.name()),
        )
    )]
    pub fn run<S, K>(&self, source: &S, sink: &mut K) -> Result<MergeReport, PanelError>
    where
        S: PanelSource + ?Sized,
        K: PanelSink + ?Sized,
    {
        let securities = source
            .load(InputKind::Securities)
            .map_err(|e| tag_load_err(InputKind::Securities, e))?;
        #[cfg(feature = "tracing")]
        tracing::info!(rows = securities.len(), columns = securities.columns().len(), "securities read");
        let fundamentals = source
            .load(InputKind::Fundamentals)
            .map_err(|e| tag_load_err(InputKind::Fundamentals, e))?;
        #[cfg(feature = "tracing")]
        tracing::info!(rows = fundamentals.len(), columns = fundamentals.columns().len(), "fundamentals read");

        let outcome = self.merge(&securities, &fundamentals)?;
        sink.write(&outcome.to_table())?;

        #[cfg(feature = "tracing")]
        tracing::info!(sink = sink.name(), rows = outcome.report.stats.output_rows, "panel saved");

        Ok(outcome.report)
    }

    /// Verify a persisted panel following the configured mismatch policy.
    ///
    /// # Errors
    /// Returns `Schema` at stage `verify` if an identifier or ticker column is absent.
    pub fn verify(&self, table: &Table) -> Result<VerificationReport, PanelError> {
        let mut reviewer = PolicyReviewer::new(self.verify_cfg.policy);
        self.verify_with(table, &mut reviewer)
    }

    /// Verify a persisted panel, consulting `reviewer` after each mismatching group.
    ///
    /// # Errors
    /// Returns `Schema` at stage `verify` if an identifier or ticker column is absent.
    pub fn verify_with(
        &self,
        table: &Table,
        reviewer: &mut dyn MismatchReviewer,
    ) -> Result<VerificationReport, PanelError> {
        verify_with_reviewer(table, &self.verify_cfg, Some(self.cfg.schema.date.as_str()), reviewer)
    }
}
