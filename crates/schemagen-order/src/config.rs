//! Run configuration for ordering and emission.
//!
//! Built once per run (usually from CLI flags) and read-only afterwards.

use std::path::{Path, PathBuf};

/// What to do with definitions that never become ready because they sit on
/// (or behind) a dependency cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CyclePolicy {
    /// Drop the stranded definitions and carry on.
    #[default]
    Drop,
    /// Fail the run and report the cycles.
    FailFast,
}

/// Output layout of the emitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitConfig {
    /// Flat directory of `{index}_{name}.{ext}` files.
    pub ordered_dir: PathBuf,
    /// Root of the namespace tree of `{ns/path}/{name}.{ext}` files.
    pub namespace_dir: PathBuf,
    /// File holding every rendered definition, concatenated in order.
    pub manifest_name: PathBuf,
    /// Extension of the per-definition files, without the dot.
    pub extension: String,
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self {
            ordered_dir: PathBuf::from("avro-schemas-ordered"),
            namespace_dir: PathBuf::from("avro-schemas"),
            manifest_name: PathBuf::from("avro-schemas.avsc"),
            extension: "avsc".to_owned(),
        }
    }
}

impl EmitConfig {
    /// Path of the ordered file for one definition.
    pub fn ordered_path(
        &self,
        out_dir: &Path,
        label: &str,
        name: &str,
    ) -> PathBuf {
        out_dir
            .join(&self.ordered_dir)
            .join(format!("{label}_{name}.{}", self.extension))
    }

    /// Path of the namespace-partitioned file for one definition.
    ///
    /// Each dot-separated namespace segment becomes one directory level.
    pub fn namespace_path(
        &self,
        out_dir: &Path,
        namespace: &str,
        name: &str,
    ) -> PathBuf {
        let mut path = out_dir.join(&self.namespace_dir);
        path.extend(namespace.split('.').filter(|s| !s.is_empty()));
        path.join(format!("{name}.{}", self.extension))
    }

    /// First piece of `namespace` or `name` that cannot be used as a single
    /// path component, if any.
    ///
    /// Empty namespace segments are skipped by [`Self::namespace_path`] and
    /// are fine; an empty name is not.
    pub fn unsafe_component<'a>(
        namespace: &'a str,
        name: &'a str,
    ) -> Option<&'a str> {
        let is_unsafe = |segment: &str| {
            segment == "."
                || segment == ".."
                || segment.contains(['/', '\\'])
        };

        namespace
            .split('.')
            .find(|&segment| is_unsafe(segment))
            .or_else(|| (name.is_empty() || is_unsafe(name)).then_some(name))
    }

    /// Path of the manifest file.
    pub fn manifest_path(&self, out_dir: &Path) -> PathBuf {
        out_dir.join(&self.manifest_name)
    }
}

/// Everything one pipeline run needs besides its input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineConfig {
    pub cycle_policy: CyclePolicy,
    pub emit: EmitConfig,
}
