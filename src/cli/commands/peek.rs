use anyhow::Result;

use crate::cli::commands::{content_key, Command, PortalContext};
use content_portal::workflow::display::{format_optional_date, format_relative};

pub struct PeekCommand {
    pub client: String,
    pub content: String,
}

impl PeekCommand {
    pub fn new(client: String, content: String) -> Self {
        Self { client, content }
    }
}

impl Command for PeekCommand {
    async fn execute(&self, context: &PortalContext) -> Result<()> {
        let store = context.load_store().await?;
        let key = content_key(&self.client, &self.content);
        let classification = store.classify(&key, context.now)?;
        let records = store.content_item(&key);

        println!("👀 {}", key);
        println!("{} {}", classification.status.badge(), classification.label);
        println!("   → {}", classification.next_action_hint);
        println!();

        match records.direction {
            Some(direction) => {
                println!("✍️  DIRECTION ({}):", format_relative(direction.created_at, context.now));
                println!("   {}", direction.direction);
                if let Some(url) = &direction.file_url {
                    println!("   📎 {}", url);
                }
            }
            None => println!("✍️  DIRECTION: not submitted yet"),
        }

        match records.submission {
            Some(submission) => {
                println!();
                println!("📤 SUBMISSION: {}", submission.draft_number);
                if let Some(url) = &submission.file_url {
                    println!("   🔗 {}", url);
                }
                if !submission.caption.is_empty() {
                    println!("   📝 {}", submission.caption);
                }
                if let Some(status) = submission.status {
                    println!("   🏷️  Status: {}", status);
                }
                println!(
                    "   🕐 Submitted {}, updated {}",
                    format_optional_date(submission.submitted_at),
                    format_relative(submission.last_updated_at, context.now)
                );
            }
            None => {
                println!();
                println!("📤 SUBMISSION: no draft uploaded yet");
            }
        }

        if !records.revisions.is_empty() {
            println!();
            println!(
                "💬 FEEDBACK ({} of {} rounds used):",
                records.revisions.len(),
                context.config.deadlines.max_feedback_cycles
            );
            for (round, revision) in records.revisions.iter().enumerate() {
                let marker = if revision.is_open() { "🔄" } else { "✔️ " };
                println!(
                    "   {} Round {} ({}): {}",
                    marker,
                    round + 1,
                    format_relative(revision.created_at, context.now),
                    revision.feedback
                );
            }
        }

        if classification.can_submit_feedback {
            println!();
            println!(
                "💡 Run 'content-portal feedback --client {} --content {} --text ...' to request changes",
                key.client_email, key.content_id
            );
        }
        Ok(())
    }
}
