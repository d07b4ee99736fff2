use crate::adapters::decklist_store::{join, DecklistStore};
use crate::core::planner::{Planner, PlannerSettings};
use crate::core::{ConfigProvider, Pipeline, Plan, PlanInput, Storage};
use crate::domain::model::PlanSummary;
use crate::utils::error::{DiffError, Result};

pub const PLAN_FILE: &str = "diff.json";
pub const ORDER_FILE: &str = "order.csv";
pub const SUMMARY_FILE: &str = "summary.json";
pub const DRY_RUN_OUTPUT: &str = "(dry run)";

/// 讀取牌表、計算搬移計畫並寫出結果
pub struct DiffPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    planner: Planner,
}

impl<S: Storage, C: ConfigProvider> DiffPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        let planner = Planner::new(PlannerSettings {
            discard_tag: config.discard_tag().to_string(),
            max_order_size: config.max_order_size(),
        });
        Self {
            storage,
            config,
            planner,
        }
    }

    fn order_csv(plan: &Plan) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(["count", "name"])?;
        for (name, count) in plan.order_list().iter() {
            writer.write_record([count.to_string().as_str(), name])?;
        }
        writer
            .into_inner()
            .map_err(|e| DiffError::IoError(e.into_error()))
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for DiffPipeline<S, C> {
    async fn extract(&self) -> Result<PlanInput> {
        tracing::debug!("Reading decklists from: {}", self.config.decklist_path());

        let store = DecklistStore::new(
            &self.storage,
            self.config.decklist_path(),
            self.config.expected_deck_size(),
        );
        store.load_input(self.config.topoff_file()).await
    }

    async fn transform(&self, input: PlanInput) -> Result<Plan> {
        let plan = self.planner.plan(&input)?;

        if self.config.enforce_order_cap() {
            if let Some(cap) = self.planner.settings().max_order_size {
                let ordered = plan.order_total();
                if ordered > cap {
                    return Err(DiffError::CapacityExceeded { ordered, cap });
                }
            }
        }

        Ok(plan)
    }

    async fn load(&self, plan: Plan) -> Result<String> {
        if self.config.dry_run() {
            tracing::info!("🔍 DRY RUN MODE - plan is not written");
            for mv in &plan.moves {
                tracing::info!(
                    "  {} -> {}: {} cards",
                    mv.source.as_deref().unwrap_or("?"),
                    mv.destination.as_deref().unwrap_or("?"),
                    mv.items.total()
                );
            }
            for warning in &plan.warnings {
                tracing::info!("  ⚠️ {}", warning);
            }
            return Ok(DRY_RUN_OUTPUT.to_string());
        }

        let output = self.config.output_path();
        let plan_path = join(output, PLAN_FILE);

        tracing::debug!("Writing {} moves to {}", plan.moves.len(), plan_path);
        self.storage
            .write_file(&plan_path, plan.to_json()?.as_bytes())
            .await?;

        let order_path = join(output, ORDER_FILE);
        self.storage
            .write_file(&order_path, &Self::order_csv(&plan)?)
            .await?;

        let summary = PlanSummary::from_plan(&plan, self.planner.settings().max_order_size);
        let summary_path = join(output, SUMMARY_FILE);
        self.storage
            .write_file(&summary_path, serde_json::to_string_pretty(&summary)?.as_bytes())
            .await?;

        tracing::debug!("Plan files saved successfully");
        Ok(plan_path)
    }
}
