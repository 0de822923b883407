use anyhow::{anyhow, Result};
use chrono::NaiveDate;

use crate::cli::commands::{Command, PortalContext};
use content_portal::store::ClientSettings;
use content_portal::workflow::display::format_calendar_date;
use content_portal::workflow::timestamps::parse_calendar_date;

pub struct RegisterCommand {
    pub client: String,
    pub content_count: u32,
    pub display_name: Option<String>,
    pub direction_deadline: Option<String>,
    pub content_deadline: Option<String>,
}

impl RegisterCommand {
    pub fn new(client: String, content_count: u32) -> Self {
        Self {
            client,
            content_count,
            display_name: None,
            direction_deadline: None,
            content_deadline: None,
        }
    }

    pub fn with_display_name(mut self, display_name: Option<String>) -> Self {
        self.display_name = display_name;
        self
    }

    pub fn with_deadlines(mut self, direction: Option<String>, content: Option<String>) -> Self {
        self.direction_deadline = direction;
        self.content_deadline = content;
        self
    }
}

fn parse_deadline(flag: &str, raw: Option<&str>) -> Result<Option<NaiveDate>> {
    raw.map(|raw| {
        parse_calendar_date(raw).ok_or_else(|| anyhow!("Invalid {} '{}': expected YYYY-MM-DD", flag, raw))
    })
    .transpose()
}

impl Command for RegisterCommand {
    async fn execute(&self, context: &PortalContext) -> Result<()> {
        let direction_deadline = parse_deadline("--direction-deadline", self.direction_deadline.as_deref())?;
        let content_deadline = parse_deadline("--content-deadline", self.content_deadline.as_deref())?;
        if let (Some(direction), Some(content)) = (direction_deadline, content_deadline) {
            if content < direction {
                return Err(anyhow!(
                    "Content deadline {} falls before the direction deadline {}",
                    content,
                    direction
                ));
            }
        }

        let mut store = context.load_store().await?;
        let client = store.register_client(ClientSettings {
            client_email: self.client.clone(),
            display_name: self.display_name.clone(),
            content_count: self.content_count,
            direction_deadline,
            content_deadline,
        })?;

        println!("🧾 Registered {} with {} content items", client.client_email, client.content_count);
        if let Some(deadline) = client.direction_deadline {
            println!("   ✍️  Directions due {}", format_calendar_date(deadline));
        }
        if let Some(deadline) = client.content_deadline {
            println!("   📦 Content due {}", format_calendar_date(deadline));
        }

        context.save_store(&store).await?;
        Ok(())
    }
}
