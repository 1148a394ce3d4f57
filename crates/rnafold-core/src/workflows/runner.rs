use crate::core::sequence::Sequence;
use crate::core::structure::FoldResult;
use crate::engine::context::FoldContext;
use crate::engine::error::FoldError;
use std::fmt;
use std::hash::{Hash, Hasher};
use tracing::instrument;

/// Asynchronous fold compound bound to one sequence.
///
/// Every call to [`mfe`](Self::mfe) runs the external tool again; results are
/// not cached.
///
/// ```no_run
/// # async fn demo() -> Result<(), cmdrnafold::FoldError> {
/// let fc = cmdrnafold::fold_compound("CGCAGGGAUACCCGCG")?;
/// let result = fc.mfe().await?;
/// println!("{} [{:6.2}]", result.structure, result.energy);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RnaRunner {
    sequence: Sequence,
    context: FoldContext,
}

impl RnaRunner {
    /// Validates `raw` and binds it to the default context.
    pub fn new(raw: &str) -> Result<Self, FoldError> {
        FoldContext::default().fold_compound(raw)
    }

    pub(crate) fn from_parts(sequence: Sequence, context: FoldContext) -> Self {
        Self { sequence, context }
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn context(&self) -> &FoldContext {
        &self.context
    }

    /// Computes the minimum free energy structure.
    ///
    /// Dropping the returned future before it completes terminates the child
    /// process.
    #[instrument(skip_all, name = "mfe", fields(sequence = %self.sequence.preview()))]
    pub async fn mfe(&self) -> Result<FoldResult, FoldError> {
        self.context.fold(&self.sequence).await
    }

    pub fn into_sync(self) -> SyncRnaRunner {
        SyncRnaRunner::from_parts(self.sequence, self.context)
    }
}

/// Blocking fold compound bound to one sequence. Needs no async runtime.
///
/// ```no_run
/// let fc = cmdrnafold::fold_compound_sync("CGCAGGGAUACCCGCG")?;
/// let (structure, mfe) = fc.mfe()?.into_tuple();
/// println!("{structure} [{mfe:6.2}]");
/// # Ok::<(), cmdrnafold::FoldError>(())
/// ```
#[derive(Clone)]
pub struct SyncRnaRunner {
    inner: RnaRunner,
}

impl SyncRnaRunner {
    pub fn new(raw: &str) -> Result<Self, FoldError> {
        FoldContext::default().fold_compound_sync(raw)
    }

    pub(crate) fn from_parts(sequence: Sequence, context: FoldContext) -> Self {
        Self {
            inner: RnaRunner::from_parts(sequence, context),
        }
    }

    pub fn sequence(&self) -> &Sequence {
        self.inner.sequence()
    }

    pub fn context(&self) -> &FoldContext {
        self.inner.context()
    }

    /// Computes the minimum free energy structure, blocking the calling thread.
    #[instrument(skip_all, name = "mfe_sync", fields(sequence = %self.inner.sequence.preview()))]
    pub fn mfe(&self) -> Result<FoldResult, FoldError> {
        self.inner.context.fold_blocking(&self.inner.sequence)
    }

    pub fn into_async(self) -> RnaRunner {
        self.inner
    }
}

impl PartialEq for RnaRunner {
    fn eq(&self, other: &Self) -> bool {
        self.sequence == other.sequence
            && self.context.config().command_line() == other.context.config().command_line()
    }
}

impl Eq for RnaRunner {}

impl Hash for RnaRunner {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.context.config().command_line().hash(state);
        self.sequence.hash(state);
    }
}

impl PartialEq for SyncRnaRunner {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl Eq for SyncRnaRunner {}

impl Hash for SyncRnaRunner {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.hash(state);
    }
}

impl fmt::Display for RnaRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RnaRunner(sequence='{}')", self.sequence.preview())
    }
}

impl fmt::Debug for RnaRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for SyncRnaRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sync{}", self.inner)
    }
}

impl fmt::Debug for SyncRnaRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
