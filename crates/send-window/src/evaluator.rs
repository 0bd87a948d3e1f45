//! Runs the rule chain and reconciles its result with explicit options.

use serde::Serialize;
use tracing::{debug, trace};

use crate::definition::NotificationOptions;
use crate::rules::{RuleInput, RuleOutcome, ScheduleRule};
use crate::window::SendWindow;

/// The raw result of walking the chain, before options are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainResult {
    Valid { rule: ScheduleRule, window: SendWindow },
    Expired,
    Exhausted,
}

/// Final decision for one notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Resolution {
    /// Send within `window`. `rule` is the rule that produced it.
    Send { window: SendWindow, rule: ScheduleRule },
    /// The request is older than `send_end_duration`. Permanent; do not retry.
    Expired,
    /// No rule applies right now. The caller may retry later or drop.
    NoWindow,
    /// The schedule would open at or after the options' cut-off.
    PastCutoff {
        window: SendWindow,
        cutoff: chrono::NaiveDateTime,
    },
}

impl Resolution {
    pub fn is_valid(&self) -> bool {
        matches!(self, Resolution::Send { .. })
    }

    /// The send window, only for a valid resolution.
    pub fn window(&self) -> Option<SendWindow> {
        match self {
            Resolution::Send { window, .. } => Some(*window),
            _ => None,
        }
    }

    pub fn into_parts(self) -> (bool, Option<SendWindow>) {
        (self.is_valid(), self.window())
    }
}

/// An ordered, immutable list of rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleChain {
    rules: &'static [ScheduleRule],
}

static STANDARD: RuleChain = RuleChain {
    rules: &ScheduleRule::CHAIN,
};

impl RuleChain {
    /// The production chain, in [`ScheduleRule::CHAIN`] order.
    pub fn standard() -> &'static RuleChain {
        &STANDARD
    }

    pub fn rules(&self) -> &'static [ScheduleRule] {
        self.rules
    }

    /// Query rules in order. Stops at the first valid window, or right away
    /// when a request has expired.
    pub fn run(&self, input: &RuleInput<'_>) -> ChainResult {
        for rule in self.rules {
            match rule.evaluate(input) {
                RuleOutcome::Valid(window) => {
                    debug!(
                        rule = %rule,
                        start = %window.start,
                        end = %window.end,
                        "rule resolved send window"
                    );
                    return ChainResult::Valid {
                        rule: *rule,
                        window,
                    };
                }
                RuleOutcome::Expired => {
                    debug!(rule = %rule, now = %input.now, "request expired, stopping rule chain");
                    return ChainResult::Expired;
                }
                RuleOutcome::Declined => trace!(rule = %rule, "rule declined"),
            }
        }
        debug!(now = %input.now, "no rule produced a send window");
        ChainResult::Exhausted
    }

    /// [`run`](Self::run) followed by [`reconcile`].
    pub fn evaluate(&self, input: &RuleInput<'_>) -> Resolution {
        reconcile(self.run(input), input.options)
    }
}

/// Apply schedule-controlled options to a chain result.
///
/// Only options with `control_with_notification_schedule` set take part: a
/// window that would start at or after their `send_end_time` is rejected, and
/// any other valid window has its end capped at `send_end_time`.
pub fn reconcile(result: ChainResult, options: Option<&NotificationOptions>) -> Resolution {
    let cutoff = options
        .filter(|o| o.control_with_notification_schedule)
        .map(|o| o.send_end_time);

    match (result, cutoff) {
        (ChainResult::Valid { window, .. }, Some(cutoff)) if window.start >= cutoff => {
            debug!(start = %window.start, cutoff = %cutoff, "send window starts past options cut-off");
            Resolution::PastCutoff { window, cutoff }
        }
        (ChainResult::Valid { rule, window }, Some(cutoff)) => Resolution::Send {
            window: window.clamp_end(cutoff),
            rule,
        },
        (ChainResult::Valid { rule, window }, None) => Resolution::Send { window, rule },
        (ChainResult::Expired, _) => Resolution::Expired,
        (ChainResult::Exhausted, _) => Resolution::NoWindow,
    }
}
