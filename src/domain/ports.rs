use crate::domain::model::{Plan, PlanInput};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// 列出目錄下的檔名（已排序），目錄不存在時回傳空清單
    fn list_files(
        &self,
        dir: &str,
    ) -> impl std::future::Future<Output = Result<Vec<String>>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn decklist_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn topoff_file(&self) -> &str;
    fn discard_tag(&self) -> &str;
    fn expected_deck_size(&self) -> u32;
    fn max_order_size(&self) -> Option<u32>;
    fn enforce_order_cap(&self) -> bool;
    fn dry_run(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<PlanInput>;
    async fn transform(&self, input: PlanInput) -> Result<Plan>;
    async fn load(&self, plan: Plan) -> Result<String>;
}
