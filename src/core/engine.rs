use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct DiffEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> DiffEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("🚀 Starting deck diff...");

        // Extract
        tracing::info!("📥 Loading decklists...");
        let input = self.pipeline.extract().await?;
        tracing::info!(
            "Loaded {} decklists, {} topoff cards",
            input.decks.len(),
            input.topoff.total()
        );

        // Transform
        tracing::info!("🧮 Computing plan...");
        let plan = self.pipeline.transform(input).await?;
        tracing::info!(
            "Planned {} moves with {} warnings",
            plan.moves.len(),
            plan.warnings.len()
        );

        // Load
        tracing::info!("💾 Saving plan...");
        let output_path = self.pipeline.load(plan).await?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(output_path)
    }
}
