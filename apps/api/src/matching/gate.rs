use std::collections::HashSet;
use std::sync::Mutex;

use uuid::Uuid;

/// Per-user single-flight guard: at most one swipe in flight per user.
#[derive(Default)]
pub struct SwipeGate {
    in_flight: Mutex<HashSet<Uuid>>,
}

/// Held while a swipe is being written; releases the user on drop.
pub struct SwipePermit<'a> {
    gate: &'a SwipeGate,
    user_id: Uuid,
}

impl SwipeGate {
    pub fn try_acquire(&self, user_id: Uuid) -> Option<SwipePermit<'_>> {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        if in_flight.insert(user_id) {
            Some(SwipePermit {
                gate: self,
                user_id,
            })
        } else {
            None
        }
    }

    #[cfg(test)]
    pub fn is_in_flight(&self, user_id: Uuid) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&user_id)
    }
}

impl Drop for SwipePermit<'_> {
    fn drop(&mut self) {
        self.gate
            .in_flight
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&self.user_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_rejected_until_release() {
        let gate = SwipeGate::default();
        let user = Uuid::new_v4();

        let permit = gate.try_acquire(user).expect("first acquire");
        assert!(gate.try_acquire(user).is_none());
        assert!(gate.is_in_flight(user));

        drop(permit);
        assert!(!gate.is_in_flight(user));
        assert!(gate.try_acquire(user).is_some());
    }

    #[test]
    fn test_users_do_not_block_each_other() {
        let gate = SwipeGate::default();
        let _a = gate.try_acquire(Uuid::new_v4()).unwrap();
        assert!(gate.try_acquire(Uuid::new_v4()).is_some());
    }
}
