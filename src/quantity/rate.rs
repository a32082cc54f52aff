use rust_decimal::dec;

quantity!(KilowattHourRate, "GBP/kWh");

impl KilowattHourRate {
    /// Off-peak EV tariff unit price.
    pub const DEFAULT: Self = Self(dec!(0.0899));
}
