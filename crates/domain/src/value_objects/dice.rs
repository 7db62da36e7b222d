//! Dice formula value objects and parsing
//!
//! Starting wealth is expressed as dice formulas like "5d4*10", "4d4 x 10",
//! "2d6+3" or a flat amount like "50". The RNG is injected by the caller.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error when parsing a dice formula
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceParseError {
    /// The formula string is empty
    #[error("Empty dice formula")]
    Empty,
    /// Invalid format - expected XdY, XdY+Z, XdY*M or a whole number
    #[error("Invalid dice format: {0}")]
    InvalidFormat(String),
    /// Dice count must be at least 1
    #[error("Dice count must be at least 1")]
    InvalidDiceCount,
    /// Die size must be at least 2
    #[error("Die size must be at least 2")]
    InvalidDieSize,
    /// Multiplier must be at least 1
    #[error("Multiplier must be at least 1")]
    InvalidMultiplier,
    /// Some possible total does not fit in an `i32`
    #[error("Dice formula total overflows: {0}")]
    Overflow(String),
}

/// A parsed dice formula like "5d4*10"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiceFormula {
    /// Number of dice to roll (X in XdY); zero for a flat amount
    pub dice_count: u8,
    /// Size of each die (Y in XdY); zero for a flat amount
    pub die_size: u8,
    /// Modifier to add/subtract after rolling (+Z or -Z)
    pub modifier: i32,
    /// Factor applied to the modified total (*M)
    pub multiplier: i32,
}

impl DiceFormula {
    /// Create a new dice formula
    pub fn new(
        dice_count: u8,
        die_size: u8,
        modifier: i32,
        multiplier: i32,
    ) -> Result<Self, DiceParseError> {
        if dice_count == 0 {
            return Err(DiceParseError::InvalidDiceCount);
        }
        if die_size < 2 {
            return Err(DiceParseError::InvalidDieSize);
        }
        if multiplier < 1 {
            return Err(DiceParseError::InvalidMultiplier);
        }
        Self {
            dice_count,
            die_size,
            modifier,
            multiplier,
        }
        .bounded()
    }

    /// Parse a formula string.
    ///
    /// Supported formats:
    /// - "XdY" / "dY" - roll X (default 1) dice of size Y
    /// - "XdY+Z" / "XdY-Z" - with a flat modifier
    /// - "XdY*M", "XdY x M", "XdY × M" - multiplied total (starting gold)
    /// - "N" - flat amount
    pub fn parse(input: &str) -> Result<Self, DiceParseError> {
        let normalized: String = input
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '(' && *c != ')')
            .map(|c| if c == '×' { '*' } else { c })
            .collect();
        if normalized.is_empty() {
            return Err(DiceParseError::Empty);
        }

        // Split off the multiplier first; "x" only counts when followed by digits
        let (body, multiplier) = split_multiplier(&normalized)?;

        let Some(d_pos) = body.find('d') else {
            let amount: i32 = body.parse().map_err(|_| {
                DiceParseError::InvalidFormat(format!("Missing 'd' separator in '{}'", body))
            })?;
            return Self {
                dice_count: 0,
                die_size: 0,
                modifier: amount,
                multiplier,
            }
            .bounded();
        };

        let dice_count_str = &body[..d_pos];
        let dice_count: u8 = if dice_count_str.is_empty() {
            1
        } else {
            dice_count_str.parse().map_err(|_| {
                DiceParseError::InvalidFormat(format!("Invalid dice count: '{}'", dice_count_str))
            })?
        };
        if dice_count == 0 {
            return Err(DiceParseError::InvalidDiceCount);
        }

        let after_d = &body[d_pos + 1..];
        let (die_size_str, modifier) = if let Some(plus_pos) = after_d.find('+') {
            let mod_str = &after_d[plus_pos + 1..];
            let modifier: i32 = mod_str.parse().map_err(|_| {
                DiceParseError::InvalidFormat(format!("Invalid modifier: '+{}'", mod_str))
            })?;
            (&after_d[..plus_pos], modifier)
        } else if let Some(minus_pos) = after_d.rfind('-') {
            if minus_pos == 0 {
                return Err(DiceParseError::InvalidFormat(format!(
                    "Invalid die size: '{}'",
                    after_d
                )));
            }
            let mod_str = &after_d[minus_pos + 1..];
            let modifier: i32 = mod_str.parse().map_err(|_| {
                DiceParseError::InvalidFormat(format!("Invalid modifier: '-{}'", mod_str))
            })?;
            (&after_d[..minus_pos], -modifier)
        } else {
            (after_d, 0)
        };

        let die_size: u8 = die_size_str.parse().map_err(|_| {
            DiceParseError::InvalidFormat(format!("Invalid die size: '{}'", die_size_str))
        })?;

        Self::new(dice_count, die_size, modifier, multiplier)
    }

    pub fn is_fixed(&self) -> bool {
        self.dice_count == 0
    }

    /// Roll the formula using `roll_die(min, max)` for each die (inclusive bounds).
    pub fn roll_with(&self, mut roll_die: impl FnMut(i32, i32) -> i32) -> DiceRollResult {
        let individual_rolls: Vec<i32> = (0..self.dice_count)
            .map(|_| roll_die(1, self.die_size as i32))
            .collect();

        let dice_total = individual_rolls
            .iter()
            .fold(0i32, |acc, roll| acc.saturating_add(*roll));
        let total = dice_total
            .saturating_add(self.modifier)
            .saturating_mul(self.multiplier);

        DiceRollResult {
            formula: self.clone(),
            individual_rolls,
            dice_total,
            total,
        }
    }

    /// Smallest and largest possible totals, `None` when either overflows.
    fn range(&self) -> Option<(i32, i32)> {
        let count = i32::from(self.dice_count);
        let faces = count.checked_mul(i32::from(self.die_size))?;
        let min = count
            .checked_add(self.modifier)?
            .checked_mul(self.multiplier)?;
        let max = faces
            .checked_add(self.modifier)?
            .checked_mul(self.multiplier)?;
        Some((min, max))
    }

    fn bounded(self) -> Result<Self, DiceParseError> {
        match self.range() {
            Some(_) => Ok(self),
            None => Err(DiceParseError::Overflow(self.display())),
        }
    }

    /// Format as a display string (e.g., "5d4*10")
    pub fn display(&self) -> String {
        let mut out = if self.is_fixed() {
            self.modifier.to_string()
        } else if self.modifier > 0 {
            format!("{}d{}+{}", self.dice_count, self.die_size, self.modifier)
        } else if self.modifier < 0 {
            format!("{}d{}{}", self.dice_count, self.die_size, self.modifier)
        } else {
            format!("{}d{}", self.dice_count, self.die_size)
        };
        if self.multiplier != 1 {
            out.push_str(&format!("*{}", self.multiplier));
        }
        out
    }
}

fn split_multiplier(normalized: &str) -> Result<(&str, i32), DiceParseError> {
    let pos = normalized.find('*').or_else(|| {
        normalized
            .rfind('x')
            .filter(|p| normalized[p + 1..].chars().all(|c| c.is_ascii_digit()))
    });
    let Some(pos) = pos else {
        return Ok((normalized, 1));
    };

    let factor_str = &normalized[pos + 1..];
    let multiplier: i32 = factor_str.parse().map_err(|_| {
        DiceParseError::InvalidFormat(format!("Invalid multiplier: '{}'", factor_str))
    })?;
    if multiplier < 1 {
        return Err(DiceParseError::InvalidMultiplier);
    }
    Ok((&normalized[..pos], multiplier))
}

impl fmt::Display for DiceFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Result of rolling dice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiceRollResult {
    /// The formula that was rolled
    pub formula: DiceFormula,
    /// Individual die results
    pub individual_rolls: Vec<i32>,
    /// Sum of dice before modifier and multiplier
    pub dice_total: i32,
    /// Final total ((dice_total + modifier) * multiplier)
    pub total: i32,
}

impl DiceRollResult {
    /// Format as a breakdown string (e.g., "5d4[1, 2, 3, 4, 4]*10 = 140")
    pub fn breakdown(&self) -> String {
        if self.formula.is_fixed() {
            return format!("{} = {}", self.formula.display(), self.total);
        }

        let rolls_str: Vec<String> = self
            .individual_rolls
            .iter()
            .map(|r| r.to_string())
            .collect();
        let mut out = format!(
            "{}d{}[{}]",
            self.formula.dice_count,
            self.formula.die_size,
            rolls_str.join(", ")
        );
        if self.formula.modifier > 0 {
            out.push_str(&format!(" + {}", self.formula.modifier));
        } else if self.formula.modifier < 0 {
            out.push_str(&format!(" - {}", -self.formula.modifier));
        }
        if self.formula.multiplier != 1 {
            out.push_str(&format!(" * {}", self.formula.multiplier));
        }
        format!("{} = {}", out, self.total)
    }
}
