use crate::error::{PcfError, PcfResult};

/// Sequence of "first" molecule indices handled by one pair task:
/// `start, start + stride, ...` for `repetitions` steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkAssignment {
    pub start: usize,
    pub stride: usize,
    pub repetitions: usize,
}

impl WorkAssignment {
    /// Assignment covering a single molecule.
    pub fn singleton(index: usize) -> Self {
        Self {
            start: index,
            stride: 0,
            repetitions: 1,
        }
    }

    pub fn indices(&self) -> impl Iterator<Item = usize> {
        let WorkAssignment {
            start,
            stride,
            repetitions,
        } = *self;
        (0..repetitions).map(move |k| start + k * stride)
    }
}

/// Static split of `n_molecules` first-indices over `n_workers` tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkPlan {
    pub main: Vec<WorkAssignment>,
    pub remainder: Vec<WorkAssignment>,
}

impl WorkPlan {
    pub fn stride_count(&self) -> usize {
        self.main.first().map(|a| a.repetitions).unwrap_or(0)
    }

    /// Every first-index in the plan, main pass then remainder.
    pub fn all_indices(&self) -> Vec<usize> {
        self.main
            .iter()
            .chain(self.remainder.iter())
            .flat_map(|a| a.indices())
            .collect()
    }
}

/// Worker `p` gets `p, p + P, p + 2P, ...` for `N / P` steps; the `N % P`
/// highest indices become singleton remainder assignments.
pub fn partition(n_molecules: usize, n_workers: usize) -> PcfResult<WorkPlan> {
    if n_workers == 0 {
        return Err(PcfError::Config("worker count must be positive".into()));
    }

    let stride_count = n_molecules / n_workers;
    let remainder = n_molecules % n_workers;

    let main = (0..n_workers)
        .map(|p| WorkAssignment {
            start: p,
            stride: n_workers,
            repetitions: stride_count,
        })
        .collect();

    let remainder = (n_molecules - remainder..n_molecules)
        .map(WorkAssignment::singleton)
        .collect();

    Ok(WorkPlan { main, remainder })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_exact_cover(n: usize, p: usize) {
        let plan = partition(n, p).unwrap();
        let mut seen = plan.all_indices();
        seen.sort_unstable();
        let expected: Vec<usize> = (0..n).collect();
        assert_eq!(seen, expected, "n={} p={}", n, p);
    }

    #[test]
    fn covers_every_molecule_exactly_once() {
        for n in 0..40 {
            for p in 1..12 {
                assert_exact_cover(n, p);
            }
        }
    }

    #[test]
    fn fewer_molecules_than_workers() {
        let plan = partition(2, 5).unwrap();
        assert_eq!(plan.main.len(), 5);
        assert!(plan.main.iter().all(|a| a.repetitions == 0));
        assert_eq!(
            plan.remainder,
            vec![WorkAssignment::singleton(0), WorkAssignment::singleton(1)]
        );
    }

    #[test]
    fn exact_division_has_no_remainder() {
        let plan = partition(12, 4).unwrap();
        assert!(plan.remainder.is_empty());
        assert_eq!(plan.stride_count(), 3);
        assert_eq!(plan.main[1].indices().collect::<Vec<_>>(), vec![1, 5, 9]);
    }

    #[test]
    fn remainder_takes_highest_indices() {
        let plan = partition(5, 3).unwrap();
        assert_eq!(plan.stride_count(), 1);
        assert_eq!(
            plan.remainder,
            vec![WorkAssignment::singleton(3), WorkAssignment::singleton(4)]
        );
    }

    #[test]
    fn zero_workers_rejected() {
        assert!(matches!(partition(10, 0), Err(PcfError::Config(_))));
    }
}
