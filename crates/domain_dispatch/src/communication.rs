//! Outreach log for an incident
//!
//! Every SMS and call placed to a roster adjuster lands here. When an
//! adjuster answers, their outstanding SMS is marked delivered and the
//! reply is logged as an inbound SMS.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{AdjusterId, MessageId, Timezone};
use domain_incident::Incident;

use crate::adjuster::{Adjuster, ResponseState};
use crate::roster::RosterView;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Sms,
    Call,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Sent by dispatch to the adjuster
    #[default]
    Outbound,
    /// The adjuster's reply
    Inbound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    Sent,
    Delivered,
    Failed,
    NoAnswer,
}

/// Display tone for a message status badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTone {
    Info,
    Success,
    Danger,
    Warning,
}

impl MessageStatus {
    pub fn tone(&self) -> StatusTone {
        match self {
            MessageStatus::Sent => StatusTone::Info,
            MessageStatus::Delivered => StatusTone::Success,
            MessageStatus::Failed => StatusTone::Danger,
            MessageStatus::NoAnswer => StatusTone::Warning,
        }
    }
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MessageStatus::Sent => "sent",
            MessageStatus::Delivered => "delivered",
            MessageStatus::Failed => "failed",
            MessageStatus::NoAnswer => "no answer",
        })
    }
}

/// One SMS or call to or from a roster adjuster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub adjuster_id: AdjusterId,
    pub adjuster_name: String,
    pub adjuster_phone: String,
    pub channel: Channel,
    #[serde(default)]
    pub direction: Direction,
    pub status: MessageStatus,
    pub timestamp: DateTime<Utc>,
    /// SMS body
    pub content: Option<String>,
    /// Call length in seconds
    pub duration_secs: Option<u32>,
}

impl Message {
    pub fn sms(adjuster: &Adjuster, content: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::blank(adjuster, Channel::Sms, at)
        }
    }

    pub fn call(adjuster: &Adjuster, duration_secs: Option<u32>, at: DateTime<Utc>) -> Self {
        Self {
            duration_secs,
            ..Self::blank(adjuster, Channel::Call, at)
        }
    }

    /// The adjuster's SMS answer, or `None` while they are still pending
    pub fn reply(adjuster: &Adjuster) -> Option<Self> {
        let content = match adjuster.state() {
            ResponseState::Pending => return None,
            ResponseState::Available { eta_minutes, .. } => format!(
                "I am available and can be on site in approximately {eta_minutes} minutes."
            ),
            ResponseState::Unavailable { .. } => {
                "I am currently unavailable to respond to this incident.".to_string()
            }
        };
        let at = adjuster.responded_at()?;
        Some(Self {
            direction: Direction::Inbound,
            status: MessageStatus::Delivered,
            ..Self::sms(adjuster, content, at)
        })
    }

    pub fn is_inbound(&self) -> bool {
        self.direction == Direction::Inbound
    }

    pub fn with_status(mut self, status: MessageStatus) -> Self {
        self.status = status;
        self
    }

    fn blank(adjuster: &Adjuster, channel: Channel, at: DateTime<Utc>) -> Self {
        Self {
            id: MessageId::new_v7(),
            adjuster_id: adjuster.id.clone(),
            adjuster_name: adjuster.name.clone(),
            adjuster_phone: adjuster.phone.clone(),
            channel,
            direction: Direction::Outbound,
            status: MessageStatus::Sent,
            timestamp: at,
            content: None,
            duration_secs: None,
        }
    }
}

/// SMS body sent to every roster adjuster
pub fn alert_text(incident: &Incident) -> String {
    format!(
        "Incident alert: {} at {}. Are you available to respond?",
        incident.title(),
        incident.loss_location
    )
}

/// Totals shown above the log
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunicationSummary {
    pub total_messages: usize,
    pub sms_sent: usize,
    pub replies: usize,
    pub calls_made: usize,
    pub responded: usize,
    pub pending: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunicationLog {
    messages: Vec<Message>,
}

impl CommunicationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Messages in the order they were recorded
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Messages newest first, ties kept in reverse insertion order
    pub fn newest_first(&self) -> Vec<Message> {
        let mut messages: Vec<Message> = self.messages.iter().rev().cloned().collect();
        messages.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        messages
    }

    /// Marks the adjuster's sent SMS as delivered, returning how many changed
    pub fn mark_delivered(&mut self, adjuster_id: &AdjusterId) -> usize {
        let mut changed = 0;
        for message in self.messages.iter_mut().filter(|m| {
            &m.adjuster_id == adjuster_id
                && m.channel == Channel::Sms
                && !m.is_inbound()
                && m.status == MessageStatus::Sent
        }) {
            message.status = MessageStatus::Delivered;
            changed += 1;
        }
        changed
    }

    /// Outbound messages on `channel`
    pub fn count(&self, channel: Channel) -> usize {
        self.outbound(channel).count()
    }

    /// Inbound replies
    pub fn replies(&self) -> usize {
        self.messages.iter().filter(|m| m.is_inbound()).count()
    }

    /// Outbound messages on `channel` whose local date in `tz` is `date`
    pub fn count_on(&self, channel: Channel, date: NaiveDate, tz: &Timezone) -> usize {
        self.count_on_where(channel, date, tz, |_| true)
    }

    /// Like `count_on`, keeping only messages `keep` accepts
    pub fn count_on_where(
        &self,
        channel: Channel,
        date: NaiveDate,
        tz: &Timezone,
        keep: impl Fn(&Message) -> bool,
    ) -> usize {
        self.outbound(channel)
            .filter(|m| tz.local_date(m.timestamp) == date && keep(m))
            .count()
    }

    fn outbound(&self, channel: Channel) -> impl Iterator<Item = &Message> {
        self.messages
            .iter()
            .filter(move |m| m.channel == channel && !m.is_inbound())
    }

    pub fn summary(&self, roster: &RosterView) -> CommunicationSummary {
        CommunicationSummary {
            total_messages: self.messages.len(),
            sms_sent: self.count(Channel::Sms),
            replies: self.replies(),
            calls_made: self.count(Channel::Call),
            responded: roster.responded(),
            pending: roster.pending.len(),
        }
    }
}
