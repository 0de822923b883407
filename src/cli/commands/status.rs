use anyhow::Result;

use crate::cli::commands::{Command, PortalContext};
use content_portal::dashboard::ClientDashboard;
use content_portal::store::PortalStore;
use content_portal::workflow::display::format_calendar_date;

pub struct StatusCommand {
    pub client: Option<String>,
    pub attention_only: bool,
    pub json: bool,
}

impl StatusCommand {
    pub fn new(client: Option<String>) -> Self {
        Self {
            client,
            attention_only: false,
            json: false,
        }
    }

    pub fn with_attention_only(mut self, attention_only: bool) -> Self {
        self.attention_only = attention_only;
        self
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    fn show_clients(&self, store: &PortalStore, context: &PortalContext) -> Result<()> {
        let clients: Vec<_> = store.clients().collect();
        if clients.is_empty() {
            println!("📭 No clients registered yet");
            println!("   💡 Register one with: content-portal register --client EMAIL --contents 3");
            return Ok(());
        }

        println!("👥 CLIENTS:");
        println!("──────────");
        for client in clients {
            let dashboard = ClientDashboard::build(store, &client.client_email, context.now)?;
            let name = client.display_name.as_deref().unwrap_or("-");
            let mut line = format!(
                "{} ({}): {} of {} delivered",
                client.client_email,
                name,
                dashboard.finished(),
                dashboard.items.len()
            );
            let attention = dashboard.needs_attention().len();
            if attention > 0 {
                line.push_str(&format!(", ⚠️  {} need attention", attention));
            }
            if let Some(deadline) = client.content_deadline {
                line.push_str(&format!(", content due {}", format_calendar_date(deadline)));
            }
            println!(" • {}", line);
        }
        println!();
        println!("💡 Run 'content-portal status --client EMAIL' for a full dashboard");
        Ok(())
    }
}

impl Command for StatusCommand {
    async fn execute(&self, context: &PortalContext) -> Result<()> {
        let store = context.load_store().await?;

        let Some(client) = &self.client else {
            return self.show_clients(&store, context);
        };

        let mut dashboard = ClientDashboard::build(&store, client, context.now)?;
        if self.attention_only {
            dashboard = dashboard.attention_only();
        }

        if self.json {
            println!("{}", serde_json::to_string_pretty(&dashboard)?);
        } else if self.attention_only && dashboard.items.is_empty() {
            println!("✅ Nothing needs attention for {}", dashboard.client_email);
        } else {
            print!("{}", dashboard.render());
        }
        Ok(())
    }
}
