use derive_more::Display;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// Decimal places kept on amounts and ratios, matching the `DECIMAL(_, 2)` columns.
pub const DECIMAL_PLACES: u32 = 2;

fn round(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Monetary amount with two decimals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{:.2}", _0)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Rounds half away from zero to two decimals.
    pub fn new(amount: Decimal) -> Self {
        Money(round(amount))
    }

    pub fn amount(self) -> Decimal {
        self.0
    }

    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Adds every amount, `None` on overflow.
    pub fn checked_sum<I: IntoIterator<Item = Money>>(amounts: I) -> Option<Money> {
        amounts
            .into_iter()
            .try_fold(Money::ZERO, |acc, amount| acc.checked_add(amount))
    }

    /// `self - other`, floored at zero.
    pub fn excess_over(self, other: Money) -> Money {
        match self.0.checked_sub(other.0) {
            Some(difference) => Money(difference.max(Decimal::ZERO)),
            None if self.0 > other.0 => Money(Decimal::MAX),
            None => Money::ZERO,
        }
    }

    /// `self * num / den`, rounded. Saturates when the result does not fit.
    /// `den` must be positive.
    pub fn scale(self, num: Decimal, den: Decimal) -> Money {
        match self.0.checked_mul(num).and_then(|value| value.checked_div(den)) {
            Some(value) => Money::new(value),
            None if self.0.is_sign_negative() != num.is_sign_negative() => Money(Decimal::MIN),
            None => Money(Decimal::MAX),
        }
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        rust_decimal::serde::float::deserialize(deserializer).map(Money::new)
    }
}

/// Percentage with two decimals (`30.00` means 30%). Always within `[0, 100]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{:.2}%", _0)]
pub struct Percent(Decimal);

impl Percent {
    pub const ZERO: Percent = Percent(Decimal::ZERO);

    /// Whole percent for literals. Panics above 100, so only use with constants.
    pub const fn whole(percent: u32) -> Self {
        assert!(percent <= 100, "percent above 100");
        Percent(Decimal::from_parts(percent, 0, 0, false, 0))
    }

    /// Rounds to two decimals; `None` outside `[0, 100]`.
    pub fn new(value: Decimal) -> Option<Self> {
        let value = round(value);
        (Decimal::ZERO..=Decimal::ONE_HUNDRED)
            .contains(&value)
            .then_some(Percent(value))
    }

    pub fn value(self) -> Decimal {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }
}

impl Serialize for Percent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Percent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = rust_decimal::serde::float::deserialize(deserializer)?;
        Percent::new(value)
            .ok_or_else(|| de::Error::custom(format!("ratio must be within 0..=100, got {}", value)))
    }
}
