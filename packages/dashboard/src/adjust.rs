//! Keeps the typed amount and the slider position of one tracked quantity
//! (locked collateral or minted Dira) describing the same pending change.
//!
//! The typed amount is the size of the change; the slider is the balance that
//! would result from applying it. Either can be edited and the other is derived.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::Decimal;

use dira_types::{
    floor_to_precision, format_fixed, parse_amount_input, round_to_precision, AdjustMode,
    DiraError, PendingAdjustment,
};

/// Largest amount accepted for each mode.
#[cw_serde]
#[derive(Copy, Default)]
pub struct Limits {
    pub add: Decimal,
    pub remove: Decimal,
}

impl Limits {
    pub fn for_mode(&self, mode: AdjustMode) -> Decimal {
        match mode {
            AdjustMode::Add => self.add,
            AdjustMode::Remove => self.remove,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdjustmentControl {
    confirmed: Decimal,
    mode: AdjustMode,
    typed: String,
    amount: Decimal,
    slider: Decimal,
    limits: Limits,
    precision: u32,
}

impl AdjustmentControl {
    pub fn new(confirmed: Decimal, limits: Limits, precision: u32) -> Self {
        Self {
            confirmed,
            mode: AdjustMode::Add,
            typed: String::new(),
            amount: Decimal::zero(),
            slider: confirmed,
            limits,
            precision,
        }
    }

    pub fn confirmed(&self) -> Decimal {
        self.confirmed
    }

    pub fn mode(&self) -> AdjustMode {
        self.mode
    }

    pub fn typed(&self) -> &str {
        &self.typed
    }

    /// Balance after the pending change is applied.
    pub fn slider(&self) -> Decimal {
        self.slider
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Ceiling of the active mode.
    pub fn ceiling(&self) -> Decimal {
        self.limits.for_mode(self.mode)
    }

    /// Right end of the slider: the confirmed balance plus everything addable.
    pub fn slider_max(&self) -> Decimal {
        self.confirmed.saturating_add(self.limits.add)
    }

    /// Size of the pending change. Empty text is zero.
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn pending(&self) -> Option<PendingAdjustment> {
        let amount = self.amount();
        if amount.is_zero() {
            return None;
        }
        Some(PendingAdjustment {
            mode: self.mode,
            amount,
        })
    }

    /// Typed input. Rejected text leaves the control unchanged.
    pub fn set_typed(&mut self, input: &str) -> Result<(), DiraError> {
        let amount = parse_amount_input(input, self.precision)?;
        let ceiling = self.ceiling();
        if amount > ceiling {
            return Err(DiraError::ExceedsCeiling {
                amount: amount.to_string(),
                ceiling: ceiling.to_string(),
            });
        }

        self.typed = input.to_string();
        self.amount = amount;
        self.slider = self.slider_for(amount, self.mode);
        Ok(())
    }

    /// Fill the active ceiling.
    pub fn set_max(&mut self) -> Result<(), DiraError> {
        let ceiling = floor_to_precision(self.ceiling(), self.precision)?;
        self.typed = format_fixed(ceiling, self.precision)?;
        self.amount = ceiling;
        self.slider = self.slider_for(ceiling, self.mode);
        Ok(())
    }

    /// Slider moved to `value`. The direction of the move selects the mode.
    pub fn set_slider(&mut self, value: Decimal) -> Result<(), DiraError> {
        let value = value.min(self.slider_max());

        let (mode, diff) = if value >= self.confirmed {
            (AdjustMode::Add, value - self.confirmed)
        } else {
            (AdjustMode::Remove, self.confirmed - value)
        };

        let mut amount = round_to_precision(diff, self.precision)?;
        let ceiling = self.limits.for_mode(mode);
        if amount > ceiling {
            amount = floor_to_precision(ceiling, self.precision)?;
        }

        self.mode = mode;
        self.typed = format_fixed(amount, self.precision)?;
        self.amount = amount;
        self.slider = if amount == diff {
            value
        } else {
            self.slider_for(amount, mode)
        };
        Ok(())
    }

    /// Pointer at `fraction` (0..=1) of the bar, snapped to whole units.
    /// An empty bar ignores pointer input.
    pub fn set_pointer(&mut self, fraction: Decimal) -> Result<(), DiraError> {
        let max = self.slider_max();
        if max.is_zero() {
            return Ok(());
        }
        let fraction = fraction.min(Decimal::one());
        let value = round_to_precision(max.checked_mul(fraction)?, 0)?;
        self.set_slider(value.min(max))
    }

    /// Switch mode, clamping the typed amount to the new ceiling.
    pub fn set_mode(&mut self, mode: AdjustMode) -> Result<(), DiraError> {
        self.mode = mode;
        self.clamp_to_ceiling()
    }

    /// New confirmed balance and limits after a refresh.
    /// A changed balance discards the pending change.
    pub fn rebase(&mut self, confirmed: Decimal, limits: Limits) -> Result<(), DiraError> {
        self.limits = limits;
        if confirmed != self.confirmed {
            self.confirmed = confirmed;
            self.reset();
            return Ok(());
        }
        self.clamp_to_ceiling()
    }

    /// Drop the pending change.
    pub fn reset(&mut self) {
        self.typed.clear();
        self.amount = Decimal::zero();
        self.slider = self.confirmed;
    }

    fn clamp_to_ceiling(&mut self) -> Result<(), DiraError> {
        let ceiling = self.ceiling();
        if self.amount > ceiling {
            let clamped = floor_to_precision(ceiling, self.precision)?;
            self.typed = format_fixed(clamped, self.precision)?;
            self.amount = clamped;
        }
        self.slider = self.slider_for(self.amount, self.mode);
        Ok(())
    }

    fn slider_for(&self, amount: Decimal, mode: AdjustMode) -> Decimal {
        match mode {
            AdjustMode::Add => self.confirmed.saturating_add(amount).min(self.slider_max()),
            AdjustMode::Remove => self.confirmed.saturating_sub(amount),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    /// 100 locked, 50 in wallet, 30 unlockable
    fn control() -> AdjustmentControl {
        AdjustmentControl::new(
            dec("100"),
            Limits {
                add: dec("50"),
                remove: dec("30"),
            },
            6,
        )
    }

    #[test]
    fn test_new_control_has_no_pending_change() {
        let control = control();
        assert_eq!(control.slider(), dec("100"));
        assert_eq!(control.typed(), "");
        assert_eq!(control.mode(), AdjustMode::Add);
        assert_eq!(control.slider_max(), dec("150"));
        assert!(control.pending().is_none());
    }

    #[test]
    fn test_typed_amount_moves_slider() {
        let mut control = control();
        control.set_typed("12.5").unwrap();
        assert_eq!(control.slider(), dec("112.5"));
        assert_eq!(
            control.pending(),
            Some(PendingAdjustment {
                mode: AdjustMode::Add,
                amount: dec("12.5"),
            })
        );

        control.set_mode(AdjustMode::Remove).unwrap();
        assert_eq!(control.slider(), dec("87.5"));
    }

    #[test]
    fn test_typed_then_slider_round_trip() {
        let mut control = control();
        control.set_typed("7.123456").unwrap();
        let slider = control.slider();
        assert_eq!(slider, dec("107.123456"));

        control.set_slider(slider).unwrap();
        assert_eq!(control.mode(), AdjustMode::Add);
        assert_eq!(control.amount(), dec("7.123456"));
    }

    #[test]
    fn test_slider_below_confirmed_switches_to_remove() {
        let mut control = control();
        control.set_slider(dec("80")).unwrap();
        assert_eq!(control.mode(), AdjustMode::Remove);
        assert_eq!(control.typed(), "20.000000");
        assert_eq!(control.slider(), dec("80"));

        // back above the confirmed balance
        control.set_slider(dec("130")).unwrap();
        assert_eq!(control.mode(), AdjustMode::Add);
        assert_eq!(control.typed(), "30.000000");
    }

    #[test]
    fn test_slider_at_confirmed_is_zero_add() {
        let mut control = control();
        control.set_slider(dec("90")).unwrap();
        control.set_slider(dec("100")).unwrap();
        assert_eq!(control.mode(), AdjustMode::Add);
        assert_eq!(control.typed(), "0.000000");
        assert!(control.pending().is_none());
    }

    #[test]
    fn test_slider_amount_rounded_to_precision() {
        let mut control = control();
        control.set_slider(dec("100.0000004")).unwrap();
        assert_eq!(control.typed(), "0.000000");
        control.set_slider(dec("100.0000015")).unwrap();
        assert_eq!(control.typed(), "0.000002");
    }

    #[test]
    fn test_slider_bounded_by_ceilings() {
        let mut control = control();
        // Past the right end of the bar
        control.set_slider(dec("400")).unwrap();
        assert_eq!(control.slider(), dec("150"));
        assert_eq!(control.amount(), dec("50"));

        // Below what can be unlocked
        control.set_slider(dec("10")).unwrap();
        assert_eq!(control.mode(), AdjustMode::Remove);
        assert_eq!(control.amount(), dec("30"));
        assert_eq!(control.slider(), dec("70"));
    }

    #[test]
    fn test_last_slider_event_wins() {
        let mut control = control();
        for value in ["101", "140", "95", "120", "99", "123.25"] {
            control.set_slider(dec(value)).unwrap();
        }
        assert_eq!(control.slider(), dec("123.25"));
        assert_eq!(control.typed(), "23.250000");
        assert_eq!(control.mode(), AdjustMode::Add);
    }

    #[test]
    fn test_typed_input_rejected_on_entry() {
        let mut control = control();
        control.set_typed("5").unwrap();

        assert_eq!(
            control.set_typed("50.5"),
            Err(DiraError::ExceedsCeiling {
                amount: "50.5".to_string(),
                ceiling: "50".to_string(),
            })
        );
        assert_eq!(
            control.set_typed("1.0000001"),
            Err(DiraError::TooManyDecimals { max: 6 })
        );
        assert!(control.set_typed("1..").is_err());
        assert!(control.set_typed("abc").is_err());

        // The last accepted value survives every rejection
        assert_eq!(control.typed(), "5");
        assert_eq!(control.slider(), dec("105"));
    }

    #[test]
    fn test_typed_partial_values_accepted() {
        let mut control = control();
        control.set_typed("3.").unwrap();
        assert_eq!(control.slider(), dec("103"));
        control.set_typed("").unwrap();
        assert_eq!(control.slider(), dec("100"));
        assert!(control.pending().is_none());
    }

    #[test]
    fn test_mode_switch_clamps_to_new_ceiling() {
        let mut control = control();
        control.set_typed("45").unwrap();
        control.set_mode(AdjustMode::Remove).unwrap();

        assert_eq!(control.typed(), "30.000000");
        assert_eq!(control.slider(), dec("70"));

        // Within the ceiling nothing is clamped
        control.set_typed("10").unwrap();
        control.set_mode(AdjustMode::Add).unwrap();
        assert_eq!(control.typed(), "10");
        assert_eq!(control.slider(), dec("110"));
    }

    #[test]
    fn test_mode_switch_clamp_never_exceeds_ceiling() {
        let mut control = AdjustmentControl::new(
            dec("10"),
            Limits {
                add: dec("5"),
                remove: dec("1.2345679"),
            },
            6,
        );
        control.set_typed("4").unwrap();
        control.set_mode(AdjustMode::Remove).unwrap();
        assert_eq!(control.amount(), dec("1.234567"));
        assert!(control.amount() <= control.ceiling());
    }

    #[test]
    fn test_set_max() {
        let mut control = control();
        control.set_max().unwrap();
        assert_eq!(control.typed(), "50.000000");
        assert_eq!(control.slider(), dec("150"));

        control.set_mode(AdjustMode::Remove).unwrap();
        control.set_max().unwrap();
        assert_eq!(control.typed(), "30.000000");
        assert_eq!(control.slider(), dec("70"));
    }

    #[test]
    fn test_derived_text_uses_display_precision() {
        let mut control = control();
        control.set_slider(dec("112.5")).unwrap();
        assert_eq!(control.typed(), "12.500000");

        control.set_typed("45").unwrap();
        control.set_mode(AdjustMode::Remove).unwrap();
        assert_eq!(control.typed(), "30.000000");

        control.set_max().unwrap();
        assert_eq!(control.typed(), "30.000000");
    }

    #[test]
    fn test_amount_follows_every_edit() {
        let mut control = AdjustmentControl::new(
            dec("10"),
            Limits {
                add: dec("5"),
                remove: dec("2.5"),
            },
            2,
        );
        control.set_typed("3.").unwrap();
        assert_eq!(control.amount(), dec("3"));

        control.set_slider(dec("8.125")).unwrap();
        assert_eq!(control.typed(), "1.88");
        assert_eq!(control.amount(), dec("1.88"));

        control.set_max().unwrap();
        assert_eq!(control.amount(), dec("2.5"));

        control.reset();
        assert_eq!(control.amount(), Decimal::zero());
        assert!(control.pending().is_none());
    }

    #[test]
    fn test_pointer_snaps_to_whole_units() {
        let mut control = control();
        // 0.5 of 150
        control.set_pointer(Decimal::percent(50)).unwrap();
        assert_eq!(control.slider(), dec("75"));
        assert_eq!(control.mode(), AdjustMode::Remove);

        // 0.7 of 150 = 105
        control.set_pointer(Decimal::percent(70)).unwrap();
        assert_eq!(control.slider(), dec("105"));
        assert_eq!(control.typed(), "5.000000");

        // Past the end of the bar
        control.set_pointer(Decimal::percent(250)).unwrap();
        assert_eq!(control.slider(), dec("150"));
    }

    #[test]
    fn test_pointer_ignored_on_empty_bar() {
        let mut control = AdjustmentControl::new(Decimal::zero(), Limits::default(), 6);
        control.set_pointer(Decimal::percent(40)).unwrap();
        assert_eq!(control.slider(), Decimal::zero());
        assert_eq!(control.typed(), "");
    }

    #[test]
    fn test_confirmed_change_resets_pending() {
        let mut control = control();
        control.set_typed("20").unwrap();

        control
            .rebase(
                dec("120"),
                Limits {
                    add: dec("30"),
                    remove: dec("40"),
                },
            )
            .unwrap();

        assert_eq!(control.typed(), "");
        assert_eq!(control.slider(), dec("120"));
        assert_eq!(control.confirmed(), dec("120"));
        assert!(control.pending().is_none());
    }

    #[test]
    fn test_unchanged_confirmed_keeps_pending_within_new_limits() {
        let mut control = control();
        control.set_typed("20").unwrap();

        // Wallet shrank under the typed amount
        control
            .rebase(
                dec("100"),
                Limits {
                    add: dec("15"),
                    remove: dec("30"),
                },
            )
            .unwrap();
        assert_eq!(control.typed(), "15.000000");
        assert_eq!(control.slider(), dec("115"));

        control
            .rebase(
                dec("100"),
                Limits {
                    add: dec("50"),
                    remove: dec("30"),
                },
            )
            .unwrap();
        assert_eq!(control.typed(), "15.000000");
        assert_eq!(control.amount(), dec("15"));
    }
}
