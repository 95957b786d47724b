use std::collections::HashMap;

use tracing::{debug, trace};

use crate::config::SchedulerConfig;
use super::types::{AvailabilityTable, DayLabel, ScheduleOutcome, Slot};

/// Occupancy levels scanned per candidate: half-filled slots first, then
/// empty ones. This is what drives candidates into pairs.
const PRIORITY_LEVELS: [usize; 2] = [1, 0];

/// Backtracking search that gives every candidate at most one slot.
///
/// A candidate with no consistent slot is skipped rather than failing the
/// run, so a search always terminates successfully. Occupancy maps are
/// pre-populated with every slot and day from the catalog.
pub struct AssignmentEngine<'a> {
    slots: &'a [Slot],
    availability: &'a AvailabilityTable,
    total_cap_per_slot: usize,
    daily_limit: usize,
    assignment: HashMap<String, Slot>,
    slot_occupancy: HashMap<Slot, usize>,
    daily_occupancy: HashMap<DayLabel, usize>,
    skipped: Vec<String>,
}

/// One candidate's position in the explicit-stack search
struct Frame {
    index: usize,
    level: usize,
    cursor: usize,
    placed: Option<usize>,
    skipping: bool,
}

impl Frame {
    fn new(index: usize) -> Self {
        Frame {
            index,
            level: 0,
            cursor: 0,
            placed: None,
            skipping: false,
        }
    }
}

impl<'a> AssignmentEngine<'a> {
    pub fn new(
        slots: &'a [Slot],
        availability: &'a AvailabilityTable,
        total_cap_per_slot: usize,
        daily_limit: usize,
    ) -> Self {
        let mut slot_occupancy = HashMap::with_capacity(slots.len());
        let mut daily_occupancy = HashMap::new();
        for slot in slots {
            slot_occupancy.insert(slot.clone(), 0);
            daily_occupancy.entry(slot.day.clone()).or_insert(0);
        }

        AssignmentEngine {
            slots,
            availability,
            total_cap_per_slot,
            daily_limit,
            assignment: HashMap::new(),
            slot_occupancy,
            daily_occupancy,
            skipped: Vec::new(),
        }
    }

    pub fn from_config(
        slots: &'a [Slot],
        availability: &'a AvailabilityTable,
        config: &SchedulerConfig,
    ) -> Self {
        Self::new(slots, availability, config.total_cap_per_slot, config.daily_limit)
    }

    pub fn slot_occupancy(&self, slot: &Slot) -> usize {
        self.slot_occupancy.get(slot).copied().unwrap_or(0)
    }

    pub fn daily_occupancy(&self, day: &DayLabel) -> usize {
        self.daily_occupancy.get(day).copied().unwrap_or(0)
    }

    pub fn assignment(&self) -> &HashMap<String, Slot> {
        &self.assignment
    }

    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    /// Whether `candidate` may take `slot` right now: the day is under its
    /// limit, the slot is under capacity and the candidate is available at
    /// the slot's hour.
    pub fn is_consistent(&self, candidate: &str, slot: &Slot) -> bool {
        if self.daily_occupancy(&slot.day) >= self.daily_limit {
            return false;
        }
        if self.slot_occupancy(slot) >= self.total_cap_per_slot {
            return false;
        }
        self.availability.is_available(candidate, &slot.day, slot.hour())
    }

    pub(crate) fn place(&mut self, candidate: &str, slot: &Slot) {
        self.assignment.insert(candidate.to_string(), slot.clone());
        *self.slot_occupancy.entry(slot.clone()).or_insert(0) += 1;
        *self.daily_occupancy.entry(slot.day.clone()).or_insert(0) += 1;
        trace!(candidate, slot = %slot, "placed");
    }

    /// Exact inverse of `place`, undone in reverse order.
    pub(crate) fn unplace(&mut self, candidate: &str, slot: &Slot) {
        if let Some(count) = self.daily_occupancy.get_mut(&slot.day) {
            *count -= 1;
        }
        if let Some(count) = self.slot_occupancy.get_mut(slot) {
            *count -= 1;
        }
        self.assignment.remove(candidate);
        trace!(candidate, slot = %slot, "backtracked");
    }

    /// Finds the next slot at or after (`level`, `cursor`) whose occupancy
    /// equals the level's value and that `candidate` is consistent with.
    /// Leaves the cursor just past the returned slot.
    fn next_consistent_slot(&self, candidate: &str, level: &mut usize, cursor: &mut usize) -> Option<usize> {
        while *level < PRIORITY_LEVELS.len() {
            let wanted = PRIORITY_LEVELS[*level];
            while *cursor < self.slots.len() {
                let idx = *cursor;
                *cursor += 1;
                let slot = &self.slots[idx];
                if self.slot_occupancy(slot) == wanted && self.is_consistent(candidate, slot) {
                    return Some(idx);
                }
            }
            *level += 1;
            *cursor = 0;
        }
        None
    }

    fn skip(&mut self, candidate: &str) {
        debug!(candidate, "no consistent slot, skipping");
        self.skipped.push(candidate.to_string());
    }

    /// Recursive search over `order[index..]`. Depth equals the number of
    /// remaining candidates.
    pub fn solve(&mut self, order: &[String], index: usize) -> bool {
        if index >= order.len() {
            return true;
        }

        let slots = self.slots;
        let current = order[index].as_str();
        let (mut level, mut cursor) = (0, 0);

        while let Some(idx) = self.next_consistent_slot(current, &mut level, &mut cursor) {
            let slot = &slots[idx];
            self.place(current, slot);
            if self.solve(order, index + 1) {
                return true;
            }
            self.unplace(current, slot);
        }

        self.skip(current);
        let solved = self.solve(order, index + 1);
        if !solved {
            self.skipped.pop();
        }
        solved
    }

    /// Same search as `solve` with an explicit frame stack, for candidate
    /// lists too long to recurse over. Branch order is identical.
    pub fn solve_iterative(&mut self, order: &[String], start: usize) -> bool {
        let slots = self.slots;
        let mut stack = vec![Frame::new(start)];
        let mut returned: Option<bool> = None;

        while let Some(top) = stack.len().checked_sub(1) {
            let frame = &mut stack[top];

            if let Some(result) = returned.take() {
                if frame.skipping {
                    if !result {
                        self.skipped.pop();
                    }
                    stack.pop();
                    returned = Some(result);
                    continue;
                }
                if let Some(idx) = frame.placed.take() {
                    if result {
                        stack.pop();
                        returned = Some(true);
                        continue;
                    }
                    self.unplace(&order[frame.index], &slots[idx]);
                }
            }

            if frame.index >= order.len() {
                stack.pop();
                returned = Some(true);
                continue;
            }

            let index = frame.index;
            let current = order[index].as_str();
            match self.next_consistent_slot(current, &mut frame.level, &mut frame.cursor) {
                Some(idx) => {
                    frame.placed = Some(idx);
                    self.place(current, &slots[idx]);
                }
                None => {
                    frame.skipping = true;
                    self.skip(current);
                }
            }
            stack.push(Frame::new(index + 1));
        }

        returned.unwrap_or(true)
    }

    /// Consumes the engine, keeping its final (possibly partial) state.
    pub fn into_outcome(self, order: &[String]) -> ScheduleOutcome {
        ScheduleOutcome {
            assignment: self.assignment,
            daily_occupancy: self.daily_occupancy,
            skipped: self.skipped,
            order: order.to_vec(),
        }
    }
}
