use crate::models::chart::FormattedReturn;
use crate::models::settings::Settings;

/// Largest number of decimal places a formatter will round to.
pub const MAX_ROUNDING_DIGITS: i32 = 10;

/// Round `value` to `digits` decimal places, halves away from zero.
///
/// Goes through `value * 10^digits`, so inputs that are not exactly
/// representable (like `1.005`) round according to their binary value.
#[must_use]
pub fn round_to(value: f64, digits: i32) -> f64 {
    let multiplier = 10f64.powi(digits);
    (value * multiplier).round() / multiplier
}

/// Sign of a return figure as it is presented. Zero counts as positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnTone {
    Positive,
    Negative,
}

impl ReturnTone {
    #[must_use]
    pub fn of(value: f64) -> Self {
        if value >= 0.0 {
            ReturnTone::Positive
        } else {
            ReturnTone::Negative
        }
    }
}

/// Applies the same precision and colours to every return figure the UI
/// shows: summary header and tooltips alike.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayFormatter {
    digits: i32,
    positive_colour: String,
    negative_colour: String,
}

impl DisplayFormatter {
    /// `digits` is clamped to `0..=MAX_ROUNDING_DIGITS`.
    pub fn new(
        digits: i32,
        positive_colour: impl Into<String>,
        negative_colour: impl Into<String>,
    ) -> Self {
        Self {
            digits: digits.clamp(0, MAX_ROUNDING_DIGITS),
            positive_colour: positive_colour.into(),
            negative_colour: negative_colour.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.rounding_digits,
            settings.positive_colour.clone(),
            settings.negative_colour.clone(),
        )
    }

    #[must_use]
    pub fn digits(&self) -> i32 {
        self.digits
    }

    #[must_use]
    pub fn round(&self, value: f64) -> f64 {
        round_to(value, self.digits)
    }

    /// Colour for `value`: positive colour when `value >= 0`, otherwise negative.
    #[must_use]
    pub fn color_for(&self, value: f64) -> &str {
        match ReturnTone::of(value) {
            ReturnTone::Positive => &self.positive_colour,
            ReturnTone::Negative => &self.negative_colour,
        }
    }

    /// Round first, then colour by the rounded value.
    #[must_use]
    pub fn format(&self, value: f64) -> FormattedReturn {
        let value = self.round(value);
        FormattedReturn {
            value,
            color: self.color_for(value).to_string(),
        }
    }
}

impl Default for DisplayFormatter {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}
