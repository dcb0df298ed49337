use eframe::egui;
use std::cell::RefCell;
use std::rc::Rc;
use std::thread;

pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Runs gateway jobs somewhere other than the caller's stack frame.
pub trait Spawner {
    fn spawn(&self, job: Job);
}

/// One short-lived thread per job; wakes the UI when the job finishes.
#[derive(Default)]
pub struct ThreadSpawner {
    repaint: Option<egui::Context>,
}

impl ThreadSpawner {
    pub fn new(ctx: egui::Context) -> Self {
        Self { repaint: Some(ctx) }
    }
}

impl Spawner for ThreadSpawner {
    fn spawn(&self, job: Job) {
        let repaint = self.repaint.clone();
        thread::spawn(move || {
            job();
            if let Some(ctx) = repaint {
                ctx.request_repaint();
            }
        });
    }
}

/// Holds jobs until the owner runs them, in whatever order it picks.
/// Lets a headless driver decide exactly when each call resolves.
#[derive(Clone, Default)]
pub struct DeferredSpawner {
    queue: Rc<RefCell<Vec<Job>>>,
}

impl DeferredSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Run the job at `index` among the pending ones.
    pub fn run(&self, index: usize) -> bool {
        let job = {
            let mut queue = self.queue.borrow_mut();
            if index >= queue.len() {
                return false;
            }
            queue.remove(index)
        };
        job();
        true
    }

    /// Run every pending job in issue order.
    pub fn run_all(&self) {
        while self.run(0) {}
    }

    /// Run every pending job, newest first.
    pub fn run_all_newest_first(&self) {
        while self.pending() > 0 {
            self.run(self.pending() - 1);
        }
    }
}

impl Spawner for DeferredSpawner {
    fn spawn(&self, job: Job) {
        self.queue.borrow_mut().push(job);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_deferred_spawner_runs_in_requested_order() {
        let spawner = DeferredSpawner::new();
        let (tx, rx) = mpsc::channel();
        for i in 0..3 {
            let tx = tx.clone();
            spawner.spawn(Box::new(move || {
                tx.send(i).ok();
            }));
        }

        assert!(spawner.run(1));
        spawner.run_all_newest_first();
        assert!(!spawner.run(0));

        assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![1, 2, 0]);
    }

    #[test]
    fn test_thread_spawner_runs_job() {
        let (tx, rx) = mpsc::channel();
        ThreadSpawner::default().spawn(Box::new(move || {
            tx.send(7).ok();
        }));
        assert_eq!(
            rx.recv_timeout(std::time::Duration::from_secs(5)).unwrap(),
            7
        );
    }
}
