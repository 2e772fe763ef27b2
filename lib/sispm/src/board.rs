use std::fmt;

use log::warn;
use tokio::sync::Mutex;

use crate::{OutletState, PowerStrip, Result};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TrackedState {
    Known(OutletState),
    Unknown,
}

impl fmt::Display for TrackedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackedState::Known(OutletState::On) => write!(f, "ON"),
            TrackedState::Known(OutletState::Off) => write!(f, "OFF"),
            TrackedState::Unknown => write!(f, "?"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outlet {
    pub slot: u8,
    pub name: String,
    pub state: TrackedState,
}

/// Power strip plus the last state each outlet is known to be in.
///
/// A state is only recorded after the tool confirmed the switch or after a
/// read-back; a failed switch leaves the outlet `Unknown`.
pub struct OutletBoard {
    strip: PowerStrip,
    outlets: Mutex<Vec<Outlet>>,
}

impl OutletBoard {
    pub fn new(strip: PowerStrip, names: &[String]) -> Self {
        let outlets = (1..=strip.slots())
            .map(|slot| Outlet {
                slot,
                name: names
                    .get(usize::from(slot) - 1)
                    .cloned()
                    .unwrap_or_else(|| format!("slot {slot}")),
                state: TrackedState::Unknown,
            })
            .collect();

        Self {
            strip,
            outlets: Mutex::new(outlets),
        }
    }

    pub fn strip(&self) -> &PowerStrip {
        &self.strip
    }

    pub async fn name(&self, slot: u8) -> Option<String> {
        let outlets = self.outlets.lock().await;
        outlets.iter().find(|o| o.slot == slot).map(|o| o.name.clone())
    }

    pub async fn switch(&self, slot: u8, state: OutletState) -> Result<()> {
        let result = self.strip.switch(slot, state).await;

        let tracked = match result {
            Ok(()) => TrackedState::Known(state),
            Err(_) => TrackedState::Unknown,
        };
        self.record(slot, tracked).await;

        result
    }

    pub async fn refresh(&self, slot: u8) -> Result<OutletState> {
        match self.strip.status(slot).await {
            Ok(state) => {
                self.record(slot, TrackedState::Known(state)).await;
                Ok(state)
            }
            Err(err) => {
                self.record(slot, TrackedState::Unknown).await;
                Err(err)
            }
        }
    }

    /// Reads every outlet back from hardware. Failures are logged and leave
    /// the outlet `Unknown`.
    pub async fn refresh_all(&self) -> Vec<Outlet> {
        for slot in 1..=self.strip.slots() {
            if let Err(err) = self.refresh(slot).await {
                warn!("unable to read outlet {slot}: {err}");
            }
        }

        self.snapshot().await
    }

    pub async fn snapshot(&self) -> Vec<Outlet> {
        self.outlets.lock().await.clone()
    }

    async fn record(&self, slot: u8, state: TrackedState) {
        let mut outlets = self.outlets.lock().await;
        if let Some(outlet) = outlets.iter_mut().find(|o| o.slot == slot) {
            outlet.state = state;
        }
    }
}
