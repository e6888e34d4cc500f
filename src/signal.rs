use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub trait ShutdownCheck {
    /// Returns true once an interrupt has been requested.
    fn should_stop(&self) -> bool;

    /// Starts catching Ctrl+C. Until then an interrupt kills the process.
    fn arm(&self) {}
}

#[derive(Debug, Clone)]
pub struct ShutdownFlag {
    flag: Arc<AtomicBool>,
    armed: Arc<AtomicBool>,
}

impl ShutdownFlag {
    pub fn new() -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
            armed: Arc::new(AtomicBool::new(false)),
        }
    }

    #[cfg(test)]
    pub fn trigger(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    #[cfg(test)]
    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::SeqCst)
    }
}

impl ShutdownCheck for ShutdownFlag {
    fn should_stop(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Registers the Ctrl+C handler once. A failed registration is only
    /// logged, the process then dies on Ctrl+C.
    fn arm(&self) {
        if self.armed.swap(true, Ordering::SeqCst) {
            return;
        }
        let handler_flag = self.flag.clone();
        if let Err(e) = ctrlc::set_handler(move || {
            handler_flag.store(true, Ordering::SeqCst);
        }) {
            log::warn!("Interrupt handler not installed: {e}");
        }
    }
}
