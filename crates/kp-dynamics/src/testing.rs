//! Call-counting stub oracles for tests.

use crate::error::{OracleError, OracleResult};
use crate::oracle::{ContactPoint, DynamicsOracle};
use kp_core::{Control, Real, State, slot};

/// What a [`StubOracle`] does on `advance`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StubMotion {
    /// Return the reset state unchanged (no gravity, no friction, no drift).
    Hold,
    /// Move the object horizontally at `rate` per second of control duration.
    Drift { rate: Real },
    /// Fail every `advance`.
    Fail,
}

#[derive(Clone, Debug)]
pub struct StubOracle {
    motion: StubMotion,
    q: State,
    sub_steps: usize,
    contacts: Vec<ContactPoint>,
    pub resets: usize,
    pub advances: usize,
    pub contact_queries: usize,
    /// Durations handed to `advance`, in call order.
    pub durations: Vec<Real>,
}

impl StubOracle {
    pub fn new(motion: StubMotion) -> Self {
        Self {
            motion,
            q: State::zeros(),
            sub_steps: 4,
            contacts: Vec::new(),
            resets: 0,
            advances: 0,
            contact_queries: 0,
            durations: Vec::new(),
        }
    }

    pub fn hold() -> Self {
        Self::new(StubMotion::Hold)
    }

    pub fn drift(rate: Real) -> Self {
        Self::new(StubMotion::Drift { rate })
    }

    pub fn failing() -> Self {
        Self::new(StubMotion::Fail)
    }

    /// Contacts reported by every proximity query (filtered by the query margin).
    pub fn with_contacts(mut self, contacts: Vec<ContactPoint>) -> Self {
        self.contacts = contacts;
        self
    }

    pub fn with_sub_steps(mut self, sub_steps: usize) -> Self {
        self.sub_steps = sub_steps;
        self
    }

    /// State the session currently holds.
    pub fn current(&self) -> &State {
        &self.q
    }
}

impl DynamicsOracle for StubOracle {
    fn reset(&mut self, q: &State) -> OracleResult<()> {
        self.q = *q;
        self.resets += 1;
        Ok(())
    }

    fn advance(
        &mut self,
        mu: &Control,
        via_points: Option<&mut Vec<State>>,
    ) -> OracleResult<State> {
        self.advances += 1;
        self.durations.push(mu[0]);
        let rate = match self.motion {
            StubMotion::Hold => 0.0,
            StubMotion::Drift { rate } => rate,
            StubMotion::Fail => {
                return Err(OracleError::Diverged {
                    what: "stub oracle always fails".to_string(),
                });
            }
        };
        let start = self.q;
        if let Some(out) = via_points {
            for i in 1..=self.sub_steps {
                let mut q = start;
                q[slot::OBJECT_X] += rate * mu[0] * i as Real / self.sub_steps as Real;
                out.push(q);
            }
        }
        self.q[slot::OBJECT_X] += rate * mu[0];
        Ok(self.q)
    }

    fn contacts(&mut self, margin: Real) -> OracleResult<Vec<ContactPoint>> {
        self.contact_queries += 1;
        Ok(self
            .contacts
            .iter()
            .filter(|c| c.distance <= margin)
            .cloned()
            .collect())
    }
}
