use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::foundation::core::ImageSize;
use crate::foundation::error::{MorphError, MorphResult};

/// Process-level generator settings, loadable from JSON.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GeneratorOpts {
    /// Canvas edge length in pixels, shared by every chain.
    pub size: u32,
    /// Seed of the random source used by `seed`.
    pub seed: u64,
    /// Desaturate the initial seed to gray.
    pub grayscale_seed: bool,
    /// Iterate chains concurrently (rayon).
    pub parallel: bool,
    /// Override the number of rayon worker threads. `None` uses the global pool.
    pub threads: Option<usize>,
}

impl Default for GeneratorOpts {
    fn default() -> Self {
        Self {
            size: 256,
            seed: 0,
            grayscale_seed: false,
            parallel: false,
            threads: None,
        }
    }
}

impl GeneratorOpts {
    /// Parse options from a JSON reader and validate them.
    pub fn from_reader<R: std::io::Read>(r: R) -> MorphResult<Self> {
        let opts: Self = serde_json::from_reader(r)
            .map_err(|e| MorphError::serde(format!("parse generator options JSON: {e}")))?;
        opts.validate()?;
        Ok(opts)
    }

    /// Parse options from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> MorphResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            MorphError::validation(format!("open options JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn validate(&self) -> MorphResult<()> {
        ImageSize::new(self.size)?;
        if let Some(n) = self.threads
            && n == 0
        {
            return Err(MorphError::validation("'threads' must be >= 1 when set"));
        }
        Ok(())
    }

    pub fn image_size(&self) -> MorphResult<ImageSize> {
        ImageSize::new(self.size)
    }
}

pub(crate) fn build_thread_pool(threads: Option<usize>) -> MorphResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(MorphError::validation("'threads' must be >= 1 when set"));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| MorphError::evaluation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/config/opts.rs"]
mod tests;
