use anyhow::Result;
use tracing::Instrument;

use crate::cli::commands::{content_key, Command, PortalContext};
use content_portal::telemetry::{create_portal_span, generate_correlation_id};

/// Final decision on a content item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Complete,
}

pub struct ReviewCommand {
    pub client: String,
    pub content: String,
    pub decision: Decision,
}

impl ReviewCommand {
    pub fn new(client: String, content: String, decision: Decision) -> Self {
        Self {
            client,
            content,
            decision,
        }
    }
}

impl Command for ReviewCommand {
    async fn execute(&self, context: &PortalContext) -> Result<()> {
        let operation = match self.decision {
            Decision::Approve => "approve",
            Decision::Complete => "complete",
        };
        let correlation_id = generate_correlation_id();
        let span = create_portal_span(operation, Some(&self.client), Some(&self.content), &correlation_id);
        self.run(context).instrument(span).await
    }
}

impl ReviewCommand {
    async fn run(&self, context: &PortalContext) -> Result<()> {
        let mut store = context.load_store().await?;
        let key = content_key(&self.client, &self.content);

        let stage = match self.decision {
            Decision::Approve => store.approve(&key, context.now)?.draft_number,
            Decision::Complete => store.complete(&key, context.now)?.draft_number,
        };
        context.save_store(&store).await?;

        match self.decision {
            Decision::Approve => {
                println!("✅ {} approved for {}", stage, key);
                println!("   → The agency will deliver the final asset");
            }
            Decision::Complete => println!("🏁 {} delivered ({})", key, stage),
        }
        Ok(())
    }
}
