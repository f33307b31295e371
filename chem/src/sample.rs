use anyhow::Result;

/// Parameters (a, b, c, d) of the conformer sample-count heuristic
/// `nsamp = min(a + b * c^ntors, d)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleParams {
    pub a: usize,
    pub b: usize,
    pub c: usize,
    /// Hard cap on the sample count
    pub d: usize,
}

impl Default for SampleParams {
    fn default() -> Self {
        Self {
            a: 12,
            b: 1,
            c: 3,
            d: 100,
        }
    }
}

impl SampleParams {
    /// Same parameters, with a different cap.
    pub fn with_cap(self, d: usize) -> Self {
        Self { d, ..self }
    }

    /// Sample count for a molecule with `ntors` torsions.
    /// Rigid molecules only need a single sample.
    pub fn sample_count(&self, ntors: usize) -> usize {
        if ntors == 0 {
            return 1;
        }
        u32::try_from(ntors)
            .ok()
            .and_then(|ntors| self.c.checked_pow(ntors))
            .and_then(|n| n.checked_mul(self.b))
            .and_then(|n| n.checked_add(self.a))
            .unwrap_or(usize::MAX)
            .min(self.d)
    }

    /// Sample count for the molecule described by an InChI or AMChI string.
    pub fn sample_count_from_chi(&self, chi: &str) -> Result<usize> {
        Ok(self.sample_count(crate::torsion_count(chi)?))
    }
}

/// Number of workers to replicate a subtask over, given its sample count.
/// One sample is taken by the subtask's own reference run, but there is always at least one worker.
pub fn worker_count(nsamp: usize) -> usize {
    nsamp.saturating_sub(1).max(1)
}
