use std::{fmt, str::FromStr};

use crate::{Error, Result};

/// Element type of a graph tensor: fixed point, floating point, logarithmic or binary.
///
/// Fixed-point types are described by their total width and the number of
/// fractional bits; floating-point types by their exponent and mantissa widths
/// (the sign bit is implicit).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum FQDtype {
    FixedPoint { bits: u8, frac_bits: u8 },
    FloatingPoint { exp_bits: u8, mantissa_bits: u8 },
    Log { bits: u8 },
    Binary,
}

impl FQDtype {
    pub const FP32: FQDtype = FQDtype::FloatingPoint {
        exp_bits: 8,
        mantissa_bits: 23,
    };
    pub const FP16: FQDtype = FQDtype::FloatingPoint {
        exp_bits: 5,
        mantissa_bits: 10,
    };
    pub const FXP32: FQDtype = FQDtype::FixedPoint {
        bits: 32,
        frac_bits: 16,
    };
    pub const FXP16: FQDtype = FQDtype::FixedPoint {
        bits: 16,
        frac_bits: 8,
    };
    pub const FXP8: FQDtype = FQDtype::FixedPoint {
        bits: 8,
        frac_bits: 4,
    };
    pub const FXP4: FQDtype = FQDtype::FixedPoint {
        bits: 4,
        frac_bits: 2,
    };
    pub const FXP2: FQDtype = FQDtype::FixedPoint {
        bits: 2,
        frac_bits: 1,
    };
    pub const LOG16: FQDtype = FQDtype::Log { bits: 16 };
    pub const BINARY: FQDtype = FQDtype::Binary;

    const NAMED: [(&'static str, FQDtype); 9] = [
        ("FP32", Self::FP32),
        ("FP16", Self::FP16),
        ("FXP32", Self::FXP32),
        ("FXP16", Self::FXP16),
        ("FXP8", Self::FXP8),
        ("FXP4", Self::FXP4),
        ("FXP2", Self::FXP2),
        ("LOG16", Self::LOG16),
        ("BINARY", Self::BINARY),
    ];

    /// Total storage width of one element.
    pub fn bits(&self) -> usize {
        match *self {
            Self::FixedPoint { bits, .. } | Self::Log { bits } => bits as usize,
            Self::FloatingPoint {
                exp_bits,
                mantissa_bits,
            } => 1 + exp_bits as usize + mantissa_bits as usize,
            Self::Binary => 1,
        }
    }

    /// Fractional bits of a fixed-point type.
    pub fn frac_bits(&self) -> Option<usize> {
        match *self {
            Self::FixedPoint { frac_bits, .. } => Some(frac_bits as usize),
            _ => None,
        }
    }

    /// Integer bits (sign included) of a fixed-point type.
    pub fn int_bits(&self) -> Option<usize> {
        match *self {
            Self::FixedPoint { bits, frac_bits } => bits.checked_sub(frac_bits).map(usize::from),
            _ => None,
        }
    }

    /// Check that every width is nonzero and a fixed-point type has no more
    /// fractional bits than total bits.
    pub fn validate(&self) -> Result<()> {
        let ok = match *self {
            Self::FixedPoint { bits, frac_bits } => bits > 0 && frac_bits <= bits,
            Self::FloatingPoint {
                exp_bits,
                mantissa_bits,
            } => exp_bits > 0 && mantissa_bits > 0,
            Self::Log { bits } => bits > 0,
            Self::Binary => true,
        };
        if ok {
            Ok(())
        } else {
            Err(Error::UnsupportedDType(*self))
        }
    }

    pub fn is_fixed_point(&self) -> bool {
        matches!(self, Self::FixedPoint { .. })
    }

    pub fn is_floating_point(&self) -> bool {
        matches!(self, Self::FloatingPoint { .. })
    }

    fn short_name(&self) -> Option<&'static str> {
        Self::NAMED
            .iter()
            .find(|(_, dtype)| dtype == self)
            .map(|(name, _)| *name)
    }
}

impl Default for FQDtype {
    fn default() -> Self {
        Self::FP32
    }
}

impl fmt::Display for FQDtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::FixedPoint { bits, frac_bits } => {
                write!(f, "FXP{bits} ({},{frac_bits})", bits.saturating_sub(frac_bits))
            }
            Self::FloatingPoint {
                exp_bits,
                mantissa_bits,
            } => match self.short_name() {
                Some(name) => write!(f, "{name}"),
                None => write!(f, "FP{} ({exp_bits},{mantissa_bits})", self.bits()),
            },
            Self::Log { bits } => write!(f, "LOG{bits}"),
            Self::Binary => write!(f, "BINARY"),
        }
    }
}

impl FromStr for FQDtype {
    type Err = Error;

    /// Parses a named member (`fp32`, `FXP8`, `binary`, ...) or the
    /// [`Display`](fmt::Display) form of any valid dtype (`FXP12 (4,8)`,
    /// `FP16 (8,7)`, `LOG8`), ignoring case.
    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_ascii_uppercase();
        Self::NAMED
            .iter()
            .find(|(name, _)| *name == upper)
            .map(|(_, dtype)| *dtype)
            .or_else(|| parse_widths(&upper))
            .filter(|dtype| dtype.validate().is_ok())
            .ok_or_else(|| Error::UnknownDType(s.to_string()))
    }
}

fn parse_widths(s: &str) -> Option<FQDtype> {
    if let Some(bits) = s.strip_prefix("LOG") {
        return Some(FQDtype::Log {
            bits: bits.parse().ok()?,
        });
    }

    let (head, rest) = s.split_once('(')?;
    let (a, b) = rest.strip_suffix(')')?.split_once(',')?;
    let a: u8 = a.trim().parse().ok()?;
    let b: u8 = b.trim().parse().ok()?;
    let head = head.trim();

    if let Some(bits) = head.strip_prefix("FXP") {
        let bits: u8 = bits.parse().ok()?;
        (a.checked_add(b)? == bits).then_some(FQDtype::FixedPoint { bits, frac_bits: b })
    } else if let Some(bits) = head.strip_prefix("FP") {
        let bits: usize = bits.parse().ok()?;
        (1 + a as usize + b as usize == bits).then_some(FQDtype::FloatingPoint {
            exp_bits: a,
            mantissa_bits: b,
        })
    } else {
        None
    }
}
