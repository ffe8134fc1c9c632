//! Interrupt vector table.

use fira_fault_inject::{Attack, FaultInjector};
use fira_hal::{Cpu, InterruptSink, Vector};
use fira_systick::SysTick;

use crate::config::ActiveAttack;

/// The components that own an interrupt: the millisecond clock on
/// Timer0 and the fault injector on Timer1.
#[derive(Debug)]
pub struct Vectors<'v, C: Cpu, A: Attack = ActiveAttack> {
    clock: SysTick<C>,
    injector: FaultInjector<'v, C, A>,
}

impl<'v, C: Cpu + Copy, A: Attack> Vectors<'v, C, A> {
    /// Create both components, unconfigured.
    pub const fn new(cpu: C) -> Self {
        Self {
            clock: SysTick::new(cpu),
            injector: FaultInjector::new(cpu),
        }
    }
}

impl<'v, C: Cpu, A: Attack> Vectors<'v, C, A> {
    /// The millisecond clock.
    pub const fn clock(&self) -> &SysTick<C> {
        &self.clock
    }

    /// The fault injector.
    pub const fn injector(&self) -> &FaultInjector<'v, C, A> {
        &self.injector
    }
}

impl<C: Cpu, A: Attack> InterruptSink for Vectors<'_, C, A> {
    fn on_interrupt(&self, vector: Vector) {
        match vector {
            Vector::Timer1CompA => self.injector.on_interrupt(vector),
            Vector::Timer0CompA => self.clock.on_compare_match(),
        }
    }
}
