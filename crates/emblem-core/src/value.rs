//! Badge values and the saturated display rule.

use serde::{Deserialize, Serialize};

use crate::errors::DropReason;

/// The maximum count shown on a badge before saturation.
pub const MAX_BADGE_CONTENT: u64 = 99;

/// An admitted badge value.
///
/// `Flag` means "show an indicator with no number" — distinct from having no
/// badge at all. `Count` is strictly positive; zero and negative requests
/// never construct a value (see [`BadgeValue::from_request`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BadgeValue {
    /// Indicator with no number (rendered as a dot/flag-style badge).
    Flag,
    /// Numeric badge with a strictly positive count.
    Count {
        /// The requested count, unsaturated.
        count: u64,
    },
}

impl BadgeValue {
    /// Validate the untrusted request form.
    ///
    /// `None` is the flag-style badge. Present counts must be strictly
    /// positive: zero and negative counts are a caller contract violation
    /// and classify as [`DropReason::InvalidValue`].
    pub fn from_request(requested: Option<i64>) -> Result<Self, DropReason> {
        match requested {
            None => Ok(Self::Flag),
            Some(n) => match u64::try_from(n) {
                Ok(count) if count > 0 => Ok(Self::Count { count }),
                _ => Err(DropReason::InvalidValue),
            },
        }
    }

    /// The user-presentable display form.
    ///
    /// Flags display as the empty string. Counts above [`MAX_BADGE_CONTENT`]
    /// display as `"99+"`: saturation rather than truncation, so the user is
    /// never shown a misleadingly exact large number.
    pub fn display(&self) -> String {
        match self {
            Self::Flag => String::new(),
            Self::Count { count } if *count > MAX_BADGE_CONTENT => {
                format!("{MAX_BADGE_CONTENT}+")
            }
            Self::Count { count } => count.to_string(),
        }
    }
}
