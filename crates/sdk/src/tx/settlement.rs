use std::sync::OnceLock;

/// Single-assignment outcome cell shared by the completion sources of one
/// operation: the first settlement wins, later ones are no-ops.
#[derive(Debug)]
pub struct Settlement<T> {
    cell: OnceLock<T>,
}

impl<T> Default for Settlement<T> {
    fn default() -> Self {
        Self { cell: OnceLock::new() }
    }
}

impl<T> Settlement<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the outcome unless one is already stored. Returns whether this
    /// call settled the cell.
    pub fn settle(&self, outcome: T) -> bool {
        self.cell.set(outcome).is_ok()
    }

    pub fn is_settled(&self) -> bool {
        self.cell.get().is_some()
    }

    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    pub fn into_inner(self) -> Option<T> {
        self.cell.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_first_writer_wins() {
        let settlement = Settlement::new();
        assert!(!settlement.is_settled());
        assert!(settlement.settle(Ok::<u64, &str>(7)));
        assert!(!settlement.settle(Err("late")));
        assert!(!settlement.settle(Ok(8)));
        assert_eq!(settlement.into_inner(), Some(Ok(7)));
    }

    #[test]
    fn test_racing_threads_settle_once() {
        let settlement = Arc::new(Settlement::new());
        let winners: usize = (0..16)
            .map(|i| {
                let settlement = settlement.clone();
                std::thread::spawn(move || settlement.settle(i))
            })
            .collect::<Vec<_>>()
            .into_iter()
            .map(|h| h.join().unwrap() as usize)
            .sum();
        assert_eq!(winners, 1);
        assert!(settlement.get().is_some());
    }
}
