use shared::domain::DashboardField;
use tracing::debug;

use crate::DashboardStore;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HydrationReport {
    pub requested: Vec<DashboardField>,
    pub ran: bool,
}

// pending fields count as absent here
pub fn hydrate_missing(
    mut is_present: impl FnMut(DashboardField) -> bool,
    mut trigger: impl FnMut(DashboardField),
) -> Vec<DashboardField> {
    let mut requested = Vec::new();
    for field in DashboardField::ALL {
        if !is_present(field) {
            trigger(field);
            requested.push(field);
        }
    }
    requested
}

#[derive(Debug, Default)]
pub struct HydrationCoordinator {
    mounted: bool,
}

impl HydrationCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn on_mount<S: DashboardStore + ?Sized>(&mut self, store: &S) -> HydrationReport {
        if self.mounted {
            return HydrationReport::default();
        }
        self.mounted = true;

        let requested = hydrate_missing(|field| store.is_present(field), |field| store.request(field));
        debug!(requested = requested.len(), "hydration complete");
        HydrationReport {
            requested,
            ran: true,
        }
    }
}

#[cfg(test)]
#[path = "tests/hydration_tests.rs"]
mod tests;
