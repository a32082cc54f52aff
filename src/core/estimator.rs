use bon::Builder;

use crate::{
    core::error::InputError,
    quantity::{cost::Cost, energy::KilowattHours, percent::Percent, rate::KilowattHourRate},
};

/// Internal precision of the energy and cost figures.
const INTERNAL_DECIMAL_PLACES: u32 = 4;

/// Precision of everything shown to the user, sent to the charger, or written to the snapshot.
const DISPLAY_DECIMAL_PLACES: u32 = 2;

#[must_use]
#[derive(Copy, Clone, Debug, Builder)]
pub struct ChargeRequest {
    pub current: Percent,

    #[builder(default = Percent::DEFAULT_TARGET)]
    pub target: Percent,

    #[builder(default = KilowattHours::DEFAULT_CAPACITY)]
    pub capacity: KilowattHours,

    #[builder(default = KilowattHourRate::DEFAULT)]
    pub price: KilowattHourRate,
}

impl ChargeRequest {
    /// Energy and cost needed to go from the current to the target state of charge.
    pub fn estimate(&self) -> Result<Estimate, InputError> {
        if self.capacity <= KilowattHours::ZERO {
            return Err(InputError::invalid(format!(
                "battery capacity must be positive, got {}",
                self.capacity,
            )));
        }
        if self.price.is_sign_negative() {
            return Err(InputError::invalid(format!(
                "price must not be negative, got {}",
                self.price,
            )));
        }

        let Some(percent_to_add) = self.current.points_to(self.target) else {
            return Ok(Estimate::AlreadyCharged);
        };
        let kwh_needed = self
            .capacity
            .checked_share(percent_to_add)
            .ok_or_else(|| {
                InputError::invalid(format!("battery capacity {} is too large", self.capacity))
            })?
            .round_to(INTERNAL_DECIMAL_PLACES);
        let estimated_cost = kwh_needed
            .checked_cost(self.price)
            .ok_or_else(|| InputError::invalid(format!("price {} is too large", self.price)))?
            .round_to(INTERNAL_DECIMAL_PLACES);
        Ok(Estimate::Required(Requirement {
            percent_to_add,
            kwh_needed,
            kwh_needed_rounded: kwh_needed.round_to(DISPLAY_DECIMAL_PLACES),
            estimated_cost,
            estimated_cost_rounded: estimated_cost.round_to(DISPLAY_DECIMAL_PLACES),
        }))
    }
}

#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Estimate {
    /// The battery is at or above the target: nothing to charge, nothing to send.
    AlreadyCharged,

    Required(Requirement),
}

impl Estimate {
    pub const fn already_charged(&self) -> bool {
        matches!(self, Self::AlreadyCharged)
    }

    pub const fn requirement(&self) -> Option<&Requirement> {
        match self {
            Self::AlreadyCharged => None,
            Self::Required(requirement) => Some(requirement),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Requirement {
    pub percent_to_add: Percent,
    pub kwh_needed: KilowattHours,
    pub kwh_needed_rounded: KilowattHours,
    pub estimated_cost: Cost,
    pub estimated_cost_rounded: Cost,
}
