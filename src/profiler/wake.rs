// PC Trace — Interrupt → Task Wake Signal
//
// Binary handoff: at most one outstanding "sample available" notification.
// Extra wakes while one is pending coalesce into it.
//
// `Wake` is the interrupt half (must never block), `Park` the task half
// (blocks with no timeout).  On the device both halves map onto a FreeRTOS
// task notification; on the host `BinarySemaphore` implements both.

use std::sync::{Arc, Condvar, Mutex};

/// Interrupt-side half of the wake signal.
pub trait Wake: Send + Sync {
    fn wake(&self);
}

/// Task-side half of the wake signal.
pub trait Park {
    /// Block until woken.  Consumes the pending notification.
    fn park(&self);
}

impl<T: Wake + ?Sized> Wake for Arc<T> {
    fn wake(&self) {
        (**self).wake()
    }
}

impl<T: Park + ?Sized> Park for Arc<T> {
    fn park(&self) {
        (**self).park()
    }
}

// ---------------------------------------------------------------------------
// Host implementation: mutex + condition variable single-permit semaphore
// ---------------------------------------------------------------------------
#[derive(Debug, Default)]
pub struct BinarySemaphore {
    permit: Mutex<bool>,
    cond: Condvar,
}

impl BinarySemaphore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the permit if one is pending, without blocking.
    pub fn try_park(&self) -> bool {
        let mut permit = self.permit.lock().unwrap_or_else(|e| e.into_inner());
        core::mem::replace(&mut *permit, false)
    }
}

impl Wake for BinarySemaphore {
    fn wake(&self) {
        let mut permit = self.permit.lock().unwrap_or_else(|e| e.into_inner());
        *permit = true;
        self.cond.notify_one();
    }
}

impl Park for BinarySemaphore {
    fn park(&self) {
        let mut permit = self.permit.lock().unwrap_or_else(|e| e.into_inner());
        while !*permit {
            permit = self.cond.wait(permit).unwrap_or_else(|e| e.into_inner());
        }
        *permit = false;
    }
}

// ---------------------------------------------------------------------------
// Device implementation: FreeRTOS task notification
// ---------------------------------------------------------------------------
#[cfg(target_os = "espidf")]
mod notification {
    use core::num::NonZeroU32;

    use esp_idf_hal::delay::BLOCK;
    use esp_idf_hal::task::notification::{Notification, Notifier};

    use super::{Park, Wake};

    impl Wake for Notifier {
        fn wake(&self) {
            // SAFETY: the notified task is the trace task, which owns the
            // `Notification` for the lifetime of the firmware.  Notification
            // bits are OR-ed, so repeated wakes coalesce.
            let _ = unsafe { self.notify_and_yield(NonZeroU32::MIN) };
        }
    }

    impl Park for Notification {
        fn park(&self) {
            let _ = Notification::wait(self, BLOCK);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn wakes_coalesce_into_one_permit() {
        let sem = BinarySemaphore::new();
        sem.wake();
        sem.wake();
        sem.wake();

        assert!(sem.try_park());
        assert!(!sem.try_park());
    }

    #[test]
    fn park_returns_immediately_with_pending_permit() {
        let sem = BinarySemaphore::new();
        sem.wake();
        sem.park();
        assert!(!sem.try_park());
    }

    #[test]
    fn park_blocks_until_woken() {
        let sem = Arc::new(BinarySemaphore::new());
        let woke = Arc::new(AtomicBool::new(false));

        let waiter = {
            let sem = Arc::clone(&sem);
            let woke = Arc::clone(&woke);
            thread::spawn(move || {
                sem.park();
                woke.store(true, Ordering::SeqCst);
            })
        };

        thread::sleep(Duration::from_millis(20));
        assert!(!woke.load(Ordering::SeqCst));

        sem.wake();
        waiter.join().unwrap();
        assert!(woke.load(Ordering::SeqCst));
    }
}
