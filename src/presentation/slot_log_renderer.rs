// Per-slot status table, rebuilt from scratch on every snapshot
use crate::application::surfaces::{SlotRow, SlotStatus, TableSurface};
use crate::domain::snapshot::duration_or_default;
use std::sync::Arc;

#[derive(Clone)]
pub struct SlotLogRenderer {
    surface: Option<Arc<dyn TableSurface>>,
}

impl SlotLogRenderer {
    pub fn new(surface: Option<Arc<dyn TableSurface>>) -> Self {
        Self { surface }
    }

    pub fn render(&self, slots: &[bool], durations: &[String]) {
        if let Some(table) = &self.surface {
            table.replace_rows(build_rows(slots, durations));
        }
    }
}

pub fn slot_label(index: usize) -> String {
    format!("Slot #{:02}", index + 1)
}

pub fn build_rows(slots: &[bool], durations: &[String]) -> Vec<SlotRow> {
    slots
        .iter()
        .enumerate()
        .map(|(index, &occupied)| SlotRow {
            label: slot_label(index),
            status: if occupied {
                SlotStatus::Occupied
            } else {
                SlotStatus::Vacant
            },
            duration: duration_or_default(durations, index).to_string(),
        })
        .collect()
}
