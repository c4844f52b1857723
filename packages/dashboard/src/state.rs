use cosmwasm_std::Decimal;

use dira_types::{AdjustMode, MarketParameters, MarketSnapshot, Position};

use crate::adjust::AdjustmentControl;
use crate::error::DashboardResult;
use crate::health::{position_health, Ceilings, Health};
use crate::orchestrator::Action;

/// Confirmed and previewed health, derived once per render.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthView {
    pub current: Health,
    pub preview: Health,
}

impl HealthView {
    pub fn is_previewing(&self) -> bool {
        self.current.percentage != self.preview.percentage
    }
}

/// View model of the dashboard: the last confirmed snapshot and one
/// adjustment control per tracked quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    snapshot: MarketSnapshot,
    ceilings: Ceilings,
    collateral: AdjustmentControl,
    debt: AdjustmentControl,
}

impl DashboardState {
    pub fn new(precision: u32) -> Self {
        let ceilings = Ceilings::default();
        Self {
            snapshot: MarketSnapshot::default(),
            collateral: AdjustmentControl::new(
                Decimal::zero(),
                ceilings.collateral_limits(),
                precision,
            ),
            debt: AdjustmentControl::new(Decimal::zero(), ceilings.debt_limits(), precision),
            ceilings,
        }
    }

    pub fn snapshot(&self) -> &MarketSnapshot {
        &self.snapshot
    }

    pub fn ceilings(&self) -> &Ceilings {
        &self.ceilings
    }

    pub fn collateral(&self) -> &AdjustmentControl {
        &self.collateral
    }

    pub fn collateral_mut(&mut self) -> &mut AdjustmentControl {
        &mut self.collateral
    }

    pub fn debt(&self) -> &AdjustmentControl {
        &self.debt
    }

    pub fn debt_mut(&mut self) -> &mut AdjustmentControl {
        &mut self.debt
    }

    /// Take a freshly fetched snapshot as the confirmed state.
    /// Controls whose confirmed balance changed drop their pending change.
    pub fn apply_snapshot(&mut self, snapshot: MarketSnapshot) -> DashboardResult<()> {
        let ceilings = Ceilings::derive(
            &snapshot.position,
            &snapshot.params,
            snapshot.wallet_balance,
        )?;

        self.collateral.rebase(
            snapshot.position.locked_collateral,
            ceilings.collateral_limits(),
        )?;
        self.debt
            .rebase(snapshot.position.minted_debt, ceilings.debt_limits())?;

        self.snapshot = snapshot;
        self.ceilings = ceilings;
        Ok(())
    }

    /// Market data without an account, e.g. while disconnected.
    pub fn apply_market(
        &mut self,
        params: MarketParameters,
        collateral_denom: String,
    ) -> DashboardResult<()> {
        let snapshot = MarketSnapshot {
            params,
            collateral_denom,
            ..self.snapshot.clone()
        };
        self.apply_snapshot(snapshot)
    }

    /// Forget the account's position after a disconnect.
    /// Market parameters are kept; they are not account specific.
    pub fn clear_account(&mut self) -> DashboardResult<()> {
        let snapshot = MarketSnapshot {
            position: Position::default(),
            wallet_balance: Decimal::zero(),
            ..self.snapshot.clone()
        };
        self.apply_snapshot(snapshot)?;
        self.collateral.reset();
        self.debt.reset();
        Ok(())
    }

    pub fn preview_position(&self) -> Position {
        Position::new(self.collateral.slider(), self.debt.slider())
    }

    pub fn health(&self) -> DashboardResult<HealthView> {
        Ok(HealthView {
            current: position_health(&self.snapshot.position, &self.snapshot.params)?,
            preview: position_health(&self.preview_position(), &self.snapshot.params)?,
        })
    }

    /// Lock or unlock, from the collateral control's pending change.
    pub fn collateral_action(&self) -> Option<Action> {
        self.collateral.pending().map(|pending| match pending.mode {
            AdjustMode::Add => Action::LockCollateral(pending.amount),
            AdjustMode::Remove => Action::UnlockCollateral(pending.amount),
        })
    }

    /// Mint or return, from the debt control's pending change.
    pub fn debt_action(&self) -> Option<Action> {
        self.debt.pending().map(|pending| match pending.mode {
            AdjustMode::Add => Action::MintDira(pending.amount),
            AdjustMode::Remove => Action::ReturnDira(pending.amount),
        })
    }
}
