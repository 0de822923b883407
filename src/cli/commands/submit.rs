use anyhow::Result;
use tracing::Instrument;

use crate::cli::commands::{content_key, Command, PortalContext};
use content_portal::telemetry::{create_portal_span, generate_correlation_id};

/// Client brief for a content item
pub struct DirectionCommand {
    pub client: String,
    pub content: String,
    pub text: String,
    pub file_url: Option<String>,
}

impl Command for DirectionCommand {
    async fn execute(&self, context: &PortalContext) -> Result<()> {
        let correlation_id = generate_correlation_id();
        let span = create_portal_span("direction", Some(&self.client), Some(&self.content), &correlation_id);
        self.run(context).instrument(span).await
    }
}

impl DirectionCommand {
    async fn run(&self, context: &PortalContext) -> Result<()> {
        let mut store = context.load_store().await?;
        let key = content_key(&self.client, &self.content);
        store.submit_direction(&key, &self.text, self.file_url.clone(), context.now)?;
        context.save_store(&store).await?;

        let classification = store.classify(&key, context.now)?;
        println!("✍️  Direction submitted for {}", key);
        println!("   → {}", classification.next_action_hint);
        Ok(())
    }
}

/// Agency draft upload for a content item
pub struct UploadCommand {
    pub client: String,
    pub content: String,
    pub file_url: String,
    pub caption: String,
}

impl Command for UploadCommand {
    async fn execute(&self, context: &PortalContext) -> Result<()> {
        let correlation_id = generate_correlation_id();
        let span = create_portal_span("upload", Some(&self.client), Some(&self.content), &correlation_id);
        self.run(context).instrument(span).await
    }
}

impl UploadCommand {
    async fn run(&self, context: &PortalContext) -> Result<()> {
        let mut store = context.load_store().await?;
        let key = content_key(&self.client, &self.content);
        let stage = store
            .upload_draft(&key, &self.file_url, &self.caption, context.now)?
            .draft_number;
        context.save_store(&store).await?;

        println!("📤 {} uploaded for {}", stage, key);
        println!("   → Waiting for the client to review");
        Ok(())
    }
}
