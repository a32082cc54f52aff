use rust_decimal::{Decimal, dec, prelude::ToPrimitive};

use crate::quantity::{cost::Cost, percent::Percent, rate::KilowattHourRate};

quantity!(KilowattHours, "kWh");

impl KilowattHours {
    /// Usable battery capacity assumed when none is given.
    pub const DEFAULT_CAPACITY: Self = Self(dec!(50));

    /// Delivered-energy threshold used when the snapshot cannot be read.
    pub const DEFAULT_GUARD_THRESHOLD: Self = Self(dec!(25));

    /// Whole kilowatt-hours, rounded up.
    pub fn ceil_whole(self) -> Option<u32> {
        self.0.ceil().to_u32()
    }

    /// The given share of this energy, or [`None`] on overflow.
    pub fn checked_share(self, percent: Percent) -> Option<Self> {
        self.0
            .checked_mul(Decimal::from(percent.get()))?
            .checked_div(Decimal::ONE_HUNDRED)
            .map(Self)
    }

    /// Cost at the given unit price, or [`None`] on overflow.
    pub fn checked_cost(self, rate: KilowattHourRate) -> Option<Cost> {
        self.0.checked_mul(rate.0).map(Cost)
    }
}
