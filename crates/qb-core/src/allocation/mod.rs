//! Attribute point allocation.
//!
//! An [`AllocationSession`] holds the status last confirmed by the server
//! (the baseline), an editable working copy, and the number of unspent
//! points. Points move between the budget and the four allocatable
//! attributes, never below the baseline, and the total is conserved.
//! Invalid moves are silent no-ops; callers disable the matching controls
//! through [`AllocationSession::can_increase`] and
//! [`AllocationSession::can_decrease`].

pub mod attribute;

pub use attribute::Attribute;

use crate::error::AllocationError;
use crate::model::{Character, Status, StatusUpdate};

/// Pending, unconfirmed point allocation for one character.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationSession {
    baseline: Status,
    working: Status,
    budget: u32,
    initial_budget: u32,
}

impl AllocationSession {
    /// Start a session over a confirmed status with `budget` unspent points.
    pub fn new(baseline: Status, budget: u32) -> Self {
        Self {
            working: baseline.clone(),
            baseline,
            budget,
            initial_budget: budget,
        }
    }

    /// Start a session from a freshly fetched character.
    pub fn from_character(character: &Character) -> Self {
        Self::new(
            character.status.clone(),
            character.available_attribute_points,
        )
    }

    /// Spend one point on `attr`. Returns false, changing nothing, when no
    /// points are left or the value cannot grow any further.
    pub fn increase(&mut self, attr: Attribute) -> bool {
        if self.budget == 0 {
            return false;
        }
        let value = attr.get_mut(&mut self.working);
        let Some(next) = value.checked_add(1) else {
            return false;
        };
        *value = next;
        self.budget -= 1;
        self.debug_check();
        true
    }

    /// Take back one point from `attr`. Returns false, changing nothing,
    /// when `attr` is already at its baseline.
    pub fn decrease(&mut self, attr: Attribute) -> bool {
        if !self.can_decrease(attr) {
            return false;
        }
        *attr.get_mut(&mut self.working) -= 1;
        self.budget += 1;
        self.debug_check();
        true
    }

    /// Spend up to `count` points on `attr`, stopping when the budget runs
    /// out. Returns how many were spent.
    pub fn increase_by(&mut self, attr: Attribute, count: u32) -> u32 {
        let limit = count.min(self.budget);
        (0..limit).take_while(|_| self.increase(attr)).count() as u32
    }

    /// Take back up to `count` points from `attr`, stopping at its
    /// baseline. Returns how many were taken back.
    pub fn decrease_by(&mut self, attr: Attribute, count: u32) -> u32 {
        let limit = count.min(self.allocated(attr));
        (0..limit).take_while(|_| self.decrease(attr)).count() as u32
    }

    /// Discard every pending change.
    pub fn reset(&mut self) {
        self.working = self.baseline.clone();
        self.budget = self.initial_budget;
    }

    /// Owned copy of the allocatable working values, taken now.
    pub fn update(&self) -> StatusUpdate {
        self.working.allocatable()
    }

    /// The status as last confirmed by the server.
    pub fn baseline(&self) -> &Status {
        &self.baseline
    }

    /// The status as currently edited.
    pub fn working(&self) -> &Status {
        &self.working
    }

    /// Points still available.
    pub fn budget(&self) -> u32 {
        self.budget
    }

    /// Points available when the session started.
    pub fn initial_budget(&self) -> u32 {
        self.initial_budget
    }

    /// Points moved onto `attr` in this session.
    pub fn allocated(&self, attr: Attribute) -> u32 {
        attr.get(&self.working)
            .saturating_sub(attr.get(&self.baseline))
            .max(0) as u32
    }

    /// Points spent across all attributes in this session.
    pub fn spent(&self) -> u32 {
        Attribute::ALL.iter().map(|&a| self.allocated(a)).sum()
    }

    /// Whether any attribute can be increased. Applies to all four at once.
    pub fn can_increase(&self) -> bool {
        self.budget > 0
    }

    /// Whether `attr` is above its baseline.
    pub fn can_decrease(&self, attr: Attribute) -> bool {
        attr.get(&self.working) > attr.get(&self.baseline)
    }

    /// Whether there is anything to commit.
    pub fn is_dirty(&self) -> bool {
        Attribute::ALL
            .iter()
            .any(|&a| a.get(&self.working) != a.get(&self.baseline))
    }

    /// Verify the baseline floor and point conservation.
    pub fn check_invariants(&self) -> Result<(), AllocationError> {
        let mut spent: i64 = 0;
        for attr in Attribute::ALL {
            let working = attr.get(&self.working);
            let baseline = attr.get(&self.baseline);
            if working < baseline {
                return Err(AllocationError::BelowBaseline {
                    attribute: attr,
                    working,
                    baseline,
                });
            }
            spent += i64::from(working) - i64::from(baseline);
        }

        if spent + i64::from(self.budget) != i64::from(self.initial_budget) {
            return Err(AllocationError::PointsNotConserved {
                spent,
                budget: self.budget,
                initial: self.initial_budget,
            });
        }
        Ok(())
    }

    fn debug_check(&self) {
        debug_assert_eq!(self.check_invariants(), Ok(()));
    }
}
