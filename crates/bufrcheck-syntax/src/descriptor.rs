use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Element descriptors `0-31-YYY` that may carry a delayed replication factor.
static DELAYED_FACTORS: Lazy<HashMap<u16, &'static str>> = Lazy::new(|| {
    let mut m = HashMap::with_capacity(5);
    m.insert(0, "short delayed descriptor replication factor");
    m.insert(1, "delayed descriptor replication factor");
    m.insert(2, "extended delayed descriptor replication factor");
    m.insert(11, "delayed descriptor and data repetition factor");
    m.insert(12, "extended delayed descriptor and data repetition factor");
    m
});

/// The `F` digit of a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DescriptorClass {
    Element,
    Replication,
    Operator,
    Sequence,
}

impl DescriptorClass {
    pub fn from_digit(digit: u8) -> Option<Self> {
        match digit {
            0 => Some(DescriptorClass::Element),
            1 => Some(DescriptorClass::Replication),
            2 => Some(DescriptorClass::Operator),
            3 => Some(DescriptorClass::Sequence),
            _ => None,
        }
    }

    pub fn digit(self) -> u8 {
        match self {
            DescriptorClass::Element => 0,
            DescriptorClass::Replication => 1,
            DescriptorClass::Operator => 2,
            DescriptorClass::Sequence => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DescriptorClass::Element => "element",
            DescriptorClass::Replication => "replication",
            DescriptorClass::Operator => "operator",
            DescriptorClass::Sequence => "sequence",
        }
    }
}

/// Why a code-shaped lexeme is not a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeError {
    Shape,
    UnknownClass(u8),
}

/// A single `FXXYYY` descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Descriptor {
    pub class: DescriptorClass,
    pub x: u8,
    pub y: u16,
}

impl Descriptor {
    pub fn new(class: DescriptorClass, x: u8, y: u16) -> Self {
        Self { class, x, y }
    }

    /// Parses either the packed `FXXYYY` form or the structured `F-XX-YYY` form.
    pub fn from_code(text: &str) -> Result<Self, CodeError> {
        let (f, x, y) = split_code(text).ok_or(CodeError::Shape)?;

        let f: u8 = f.parse().map_err(|_| CodeError::Shape)?;
        let x: u8 = x.parse().map_err(|_| CodeError::Shape)?;
        let y: u16 = y.parse().map_err(|_| CodeError::Shape)?;

        let class = DescriptorClass::from_digit(f).ok_or(CodeError::UnknownClass(f))?;
        Ok(Self { class, x, y })
    }

    /// True for the `0-31-YYY` slot that follows a delayed replication header.
    /// Whether `YYY` names a real factor is a separate question, see
    /// [`Descriptor::delayed_factor_name`].
    pub fn occupies_delayed_count_slot(&self) -> bool {
        self.class == DescriptorClass::Element && self.x == 31
    }

    pub fn delayed_factor_name(&self) -> Option<&'static str> {
        if !self.occupies_delayed_count_slot() {
            return None;
        }
        DELAYED_FACTORS.get(&self.y).copied()
    }

    pub fn is_delayed_factor(&self) -> bool {
        self.delayed_factor_name().is_some()
    }
}

fn split_code(text: &str) -> Option<(&str, &str, &str)> {
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

    if text.len() == 6 && all_digits(text) {
        return Some((&text[0..1], &text[1..3], &text[3..6]));
    }

    let mut parts = text.split('-');
    let f = parts.next()?;
    let x = parts.next()?;
    let y = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    let shaped = f.len() == 1 && x.len() == 2 && y.len() == 3;
    if shaped && all_digits(f) && all_digits(x) && all_digits(y) {
        Some((f, x, y))
    } else {
        None
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:02}{:03}", self.class.digit(), self.x, self.y)
    }
}
