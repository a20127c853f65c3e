//! Notification composition for upcoming deadlines.
//!
//! This module turns a chronologically sorted list of [`Event`]s into the
//! ordered list of [`NotificationBlock`]s sent to the webhook:
//!
//! 1. a header block (or a single "nothing scheduled" block when empty),
//! 2. one block per event for the first [`MAX_EVENT_BLOCKS`] events, colored
//!    by [`UrgencyTier`],
//! 3. an overflow block counting the events that did not fit.
//!
//! # Example
//!
//! ```rust
//! use duesoon_core::compose::NotificationComposer;
//! use duesoon_core::Event;
//! use chrono::{Duration, Utc};
//!
//! let now = Utc::now();
//! let events = vec![Event::new("課題「Report 1」", now + Duration::hours(3))];
//! let blocks = NotificationComposer::with_defaults().compose_at(&events, 48, now);
//! assert_eq!(blocks.len(), 2);
//! ```

use std::borrow::Cow;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::block::NotificationBlock;
use crate::event::Event;
use crate::time::{DEFAULT_DISPLAY_TIMEZONE, format_clock, format_deadline, hours_until};


/// Maximum number of per-event blocks in one notification.
pub const MAX_EVENT_BLOCKS: usize = 10;

/// Descriptions longer than this many characters are truncated.
pub const MAX_DESCRIPTION_CHARS: usize = 200;

/// Events due within this many hours are critical.
pub const CRITICAL_HOURS: f64 = 12.0;

/// Events due within this many hours (and not critical) are due soon.
pub const SOON_HOURS: f64 = 24.0;

/// Default footer label of the header block.
pub const DEFAULT_FOOTER_TEXT: &str = "Moodleカレンダー連携Bot";

const NOTIFY_TITLE: &str = "📚 課題通知";
const SUBJECT_GLYPH: &str = "📖";
const DESCRIPTION_FIELD_NAME: &str = "📝 補足情報";

/// Block colors.
pub mod colors {
    /// "Nothing scheduled" block.
    pub const NEUTRAL: u32 = 5_793_266;
    /// Header block.
    pub const HEADER: u32 = 15_105_570;
    /// Event due within [`super::CRITICAL_HOURS`].
    pub const CRITICAL: u32 = 15_158_332;
    /// Event due within [`super::SOON_HOURS`].
    pub const SOON: u32 = 16_776_960;
    /// Event due later.
    pub const LATER: u32 = 3_447_003;
    /// Overflow block.
    pub const OVERFLOW: u32 = 10_197_915;
}

/// Matches the first「…」enclosed sub-title.
static TASK_TITLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"「(.+?)」").expect("Invalid task title regex"));

/// Urgency of an event, based on the hours left until it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyTier {
    /// Due within 12 hours.
    Critical,
    /// Due within 24 hours.
    Soon,
    /// Due in more than 24 hours.
    Later,
}

impl UrgencyTier {
    /// Classifies the hours left until an event. Boundaries belong to the more urgent tier.
    pub fn from_hours(hours_until: f64) -> Self {
        if hours_until <= CRITICAL_HOURS {
            Self::Critical
        } else if hours_until <= SOON_HOURS {
            Self::Soon
        } else {
            Self::Later
        }
    }

    /// Returns the tier name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Soon => "soon",
            Self::Later => "later",
        }
    }

    /// Returns the block color for this tier.
    pub fn color(&self) -> u32 {
        match self {
            Self::Critical => colors::CRITICAL,
            Self::Soon => colors::SOON,
            Self::Later => colors::LATER,
        }
    }

    /// Returns the glyph shown next to the deadline.
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Critical => "⚠️",
            Self::Soon => "⏰",
            Self::Later => "🗓️",
        }
    }
}

/// Presentation options for the composer.
#[derive(Debug, Clone)]
pub struct ComposeOptions {
    /// Timezone used for the header clock and deadlines.
    pub display_timezone: Tz,
    /// Footer label of the header block.
    pub footer_text: String,
    /// Optional link appended to the header (e.g. the LMS front page).
    pub portal_url: Option<String>,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            display_timezone: DEFAULT_DISPLAY_TIMEZONE,
            footer_text: DEFAULT_FOOTER_TEXT.to_string(),
            portal_url: None,
        }
    }
}

impl ComposeOptions {
    /// Builder: set the display timezone.
    pub fn with_timezone(mut self, tz: Tz) -> Self {
        self.display_timezone = tz;
        self
    }

    /// Builder: set the footer label.
    pub fn with_footer_text(mut self, text: impl Into<String>) -> Self {
        self.footer_text = text.into();
        self
    }

    /// Builder: set the portal link.
    pub fn with_portal_url(mut self, url: impl Into<String>) -> Self {
        self.portal_url = Some(url.into());
        self
    }
}

/// Builds notification blocks from events.
#[derive(Debug, Clone)]
pub struct NotificationComposer {
    options: ComposeOptions,
}

impl NotificationComposer {
    /// Creates a composer with the given options.
    pub fn new(options: ComposeOptions) -> Self {
        Self { options }
    }

    /// Creates a composer with default options.
    pub fn with_defaults() -> Self {
        Self::new(ComposeOptions::default())
    }

    /// Returns the options.
    pub fn options(&self) -> &ComposeOptions {
        &self.options
    }

    /// Composes blocks for `events` using the current time.
    pub fn compose(&self, events: &[Event], window_hours: u32) -> Vec<NotificationBlock> {
        self.compose_at(events, window_hours, Utc::now())
    }

    /// Composes blocks for `events` as seen at `now`.
    ///
    /// `events` are expected in chronological order. The output is a pure
    /// function of the arguments.
    pub fn compose_at(
        &self,
        events: &[Event],
        window_hours: u32,
        now: DateTime<Utc>,
    ) -> Vec<NotificationBlock> {
        if events.is_empty() {
            return vec![self.empty_block(window_hours)];
        }

        let mut blocks = Vec::with_capacity(events.len().min(MAX_EVENT_BLOCKS) + 2);
        blocks.push(self.header_block(events.len(), window_hours, now));
        blocks.extend(
            events
                .iter()
                .take(MAX_EVENT_BLOCKS)
                .map(|event| self.event_block(event, now)),
        );

        let remaining = events.len().saturating_sub(MAX_EVENT_BLOCKS);
        if remaining > 0 {
            blocks.push(overflow_block(remaining));
        }

        debug!(
            events = events.len(),
            blocks = blocks.len(),
            overflow = remaining,
            "Composed notification"
        );

        blocks
    }

    /// Block sent when nothing is due within the window.
    fn empty_block(&self, window_hours: u32) -> NotificationBlock {
        NotificationBlock::new(colors::NEUTRAL)
            .with_title(NOTIFY_TITLE)
            .with_description(format!(
                "{}時間以内に予定されている課題はありません。",
                window_hours
            ))
    }

    fn header_block(&self, count: usize, window_hours: u32, now: DateTime<Utc>) -> NotificationBlock {
        let mut description = format!(
            "現在時刻: {}\n以下の{}件の課題の提出期限が{}時間以内に近づいています！",
            format_clock(now, &self.options.display_timezone),
            count,
            window_hours
        );
        if let Some(ref url) = self.options.portal_url {
            description.push_str(&format!("\n🔗 [サイトを開く]({})", url));
        }

        NotificationBlock::new(colors::HEADER)
            .with_title(NOTIFY_TITLE)
            .with_description(description)
            .with_footer(&self.options.footer_text)
    }

    fn event_block(&self, event: &Event, now: DateTime<Utc>) -> NotificationBlock {
        let tier = UrgencyTier::from_hours(hours_until(event.start_time, now));
        let deadline = format_deadline(event.start_time, &self.options.display_timezone);

        let block = NotificationBlock::new(tier.color())
            .with_title(format!("{} {}", SUBJECT_GLYPH, subject_name(&event.category)))
            .with_description(format!(
                "**課題タイトル**\n{}\n{} **提出期限**\n{}\n",
                task_title(&event.summary),
                tier.glyph(),
                deadline
            ));

        if event.description.is_empty() {
            block
        } else {
            block.with_field(
                DESCRIPTION_FIELD_NAME,
                ellipsis(&event.description, MAX_DESCRIPTION_CHARS),
                false,
            )
        }
    }
}

fn overflow_block(remaining: usize) -> NotificationBlock {
    NotificationBlock::new(colors::OVERFLOW)
        .with_description(format!("*...他 {} 件の課題があります*", remaining))
}

/// Extracts the subject name from a category such as `"MATH101 Linear Algebra"`.
///
/// The category is split at its first whitespace; the remainder is the
/// subject name. A category without whitespace is returned unchanged.
pub fn subject_name(category: &str) -> &str {
    match category.split_once(char::is_whitespace) {
        Some((_, name)) => name,
        None => category,
    }
}

/// Extracts the task title enclosed in「」from a summary, or returns the summary.
pub fn task_title(summary: &str) -> &str {
    TASK_TITLE_REGEX
        .captures(summary)
        .and_then(|caps| caps.get(1))
        .map_or(summary, |m| m.as_str())
}

/// Truncates a string with ellipsis if it exceeds the given length.
///
/// Lengths are counted in characters. The result, ellipsis included, is at
/// most `max_len` characters long.
pub fn ellipsis(s: &str, max_len: usize) -> Cow<'_, str> {
    if max_len == 0 {
        return Cow::Borrowed("");
    }

    if s.chars().count() <= max_len {
        return Cow::Borrowed(s);
    }

    let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
    Cow::Owned(format!("{}...", truncated))
}
