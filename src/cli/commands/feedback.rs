use anyhow::Result;
use tracing::Instrument;

use crate::cli::commands::{content_key, Command, PortalContext};
use content_portal::telemetry::{create_portal_span, generate_correlation_id};
use content_portal::workflow::display::pluralize;

pub struct FeedbackCommand {
    pub client: String,
    pub content: String,
    pub text: String,
    pub file_url: Option<String>,
}

impl Command for FeedbackCommand {
    async fn execute(&self, context: &PortalContext) -> Result<()> {
        let correlation_id = generate_correlation_id();
        let span = create_portal_span("feedback", Some(&self.client), Some(&self.content), &correlation_id);
        self.run(context).instrument(span).await
    }
}

impl FeedbackCommand {
    async fn run(&self, context: &PortalContext) -> Result<()> {
        let mut store = context.load_store().await?;
        let key = content_key(&self.client, &self.content);
        let next_stage = store
            .submit_feedback(&key, &self.text, self.file_url.clone(), context.now)?
            .next_draft_stage;
        context.save_store(&store).await?;

        let remaining = store.classify(&key, context.now)?.feedback_remaining;
        println!("💬 Feedback sent for {}", key);
        if let Some(stage) = next_stage {
            println!("   → The agency will prepare {}", stage);
        }
        println!("   🔁 {} left", pluralize(remaining, "feedback round"));
        Ok(())
    }
}
