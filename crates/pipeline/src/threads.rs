use std::{
    io,
    sync::atomic::{AtomicUsize, Ordering},
    thread::{self, JoinHandle},
};

/// Spawns named threads. The first thread gets the bare prefix, later ones
/// get `prefix-2`, `prefix-3`, and so on.
#[derive(Debug)]
pub struct ThreadNamer {
    prefix: &'static str,
    count: AtomicUsize,
}

impl ThreadNamer {
    pub const fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            count: AtomicUsize::new(0),
        }
    }

    pub fn next_name(&self) -> String {
        let n = self.count.fetch_add(1, Ordering::Relaxed) + 1;
        if n == 1 {
            self.prefix.to_owned()
        } else {
            format!("{}-{n}", self.prefix)
        }
    }

    pub fn spawn<F, T>(&self, f: F) -> io::Result<JoinHandle<T>>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        thread::Builder::new().name(self.next_name()).spawn(f)
    }
}
