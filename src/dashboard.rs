//! Client dashboard: every content item in a package, classified, plus
//! per-status counts.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::store::{PortalStore, StoreError};
use crate::workflow::deadlines::DeadlineState;
use crate::workflow::display::{format_calendar_date, pluralize};
use crate::workflow::{Classification, ContentKey, ContentStatus};

#[derive(Debug, Clone, Serialize)]
pub struct DashboardItem {
    pub content_id: String,
    pub classification: Classification,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientDashboard {
    pub client_email: String,
    pub display_name: Option<String>,
    pub items: Vec<DashboardItem>,
    pub counts: BTreeMap<ContentStatus, usize>,
    pub generated_at: DateTime<Utc>,
}

impl ClientDashboard {
    pub fn build(store: &PortalStore, client_email: &str, now: DateTime<Utc>) -> Result<Self, StoreError> {
        let client = store.client(client_email)?;

        let mut items = Vec::new();
        let mut counts = BTreeMap::new();
        for content_id in store.content_ids_for(&client.client_email)? {
            let key = ContentKey::new(&client.client_email, &content_id);
            let classification = store.classify(&key, now)?;
            *counts.entry(classification.status).or_insert(0) += 1;
            items.push(DashboardItem {
                content_id,
                classification,
            });
        }

        tracing::debug!(
            client = %client.client_email,
            items = items.len(),
            "Dashboard built"
        );

        Ok(Self {
            client_email: client.client_email.clone(),
            display_name: client.display_name.clone(),
            items,
            counts,
            generated_at: now,
        })
    }

    /// Items that are overdue or due soon, overdue first
    pub fn needs_attention(&self) -> Vec<&DashboardItem> {
        let mut flagged: Vec<&DashboardItem> = self
            .items
            .iter()
            .filter(|item| item.classification.status.needs_attention())
            .collect();
        flagged.sort_by_key(|item| !item.classification.status.is_overdue());
        flagged
    }

    /// Narrow the dashboard to flagged items, overdue first, recounting statuses
    pub fn attention_only(mut self) -> Self {
        self.items.retain(|item| item.classification.status.needs_attention());
        self.items
            .sort_by_key(|item| !item.classification.status.is_overdue());
        self.counts = BTreeMap::new();
        for item in &self.items {
            *self.counts.entry(item.classification.status).or_insert(0) += 1;
        }
        self
    }

    pub fn count(&self, status: ContentStatus) -> usize {
        self.counts.get(&status).copied().unwrap_or(0)
    }

    pub fn finished(&self) -> usize {
        self.count(ContentStatus::Approved) + self.count(ContentStatus::Completed)
    }

    /// Format the dashboard for terminal display
    pub fn render(&self) -> String {
        let mut output = String::new();

        let title = self.display_name.as_deref().unwrap_or(&self.client_email);
        output.push_str(&format!("📋 CONTENT STATUS: {}\n", title));
        output.push_str("─────────────────────\n");

        if self.items.is_empty() {
            output.push_str("📭 No content items in this package\n");
            return output;
        }

        for item in &self.items {
            let classification = &item.classification;
            output.push_str(&format!(
                "{} {:<12} {}\n",
                classification.status.badge(),
                item.content_id,
                classification.label
            ));
            output.push_str(&format!("   → {}\n", classification.next_action_hint));
            if let Some(deadline) = classification.content_deadline {
                output.push_str(&format!("   ⏰ {}\n", describe_deadline(deadline)));
            }
        }

        output.push('\n');
        output.push_str(&format!(
            "📊 {} of {} delivered",
            self.finished(),
            self.items.len()
        ));
        let attention = self.needs_attention().len();
        if attention > 0 {
            output.push_str(&format!(", {} need attention", attention));
        }
        output.push('\n');
        output.push_str(&format!(
            "🕐 As of {}\n",
            format_calendar_date(self.generated_at.date_naive())
        ));

        output
    }
}

fn describe_deadline(deadline: DeadlineState) -> String {
    match deadline {
        DeadlineState::OnTrack { days_left } => {
            format!("Content deadline in {}", pluralize(days_left, "day"))
        }
        DeadlineState::DueSoon { days_left: 0 } => "Content deadline today".to_string(),
        DeadlineState::DueSoon { days_left } => {
            format!("Content deadline in {} (due soon)", pluralize(days_left, "day"))
        }
        DeadlineState::Overdue { days_overdue } => {
            format!("Content deadline passed {} ago", pluralize(days_overdue, "day"))
        }
    }
}
