use crate::error::{Result, SegmentError};
use image::GrayImage;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Debug configuration for pipeline execution
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Root directory for debug outputs
    pub output_dir: PathBuf,
    /// Runs started so far; shared by clones so sub-directories never collide
    runs: Arc<AtomicUsize>,
}

impl DebugConfig {
    /// Use `output_dir` for debug images.
    /// The directory must be empty or non-existent
    pub fn new(output_dir: PathBuf) -> Result<Self> {
        if output_dir.exists() {
            let mut entries = std::fs::read_dir(&output_dir).map_err(|source| {
                SegmentError::ReadDir {
                    path: output_dir.clone(),
                    source,
                }
            })?;
            if entries.next().is_some() {
                return Err(SegmentError::DebugDirNotEmpty(output_dir));
            }
        } else {
            create_dir(&output_dir)?;
        }
        Ok(Self {
            output_dir,
            runs: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Create the `NNN_label` sub-directory for the next run
    fn start_run(&self, label: &str) -> Result<PathBuf> {
        let index = self.runs.fetch_add(1, Ordering::Relaxed);
        let dir = self.output_dir.join(format!("{:03}_{}", index, label));
        create_dir(&dir)?;
        Ok(dir)
    }
}

/// Save one stage image as `NN_stage_name.png` inside `run_dir`
fn save_stage(run_dir: &Path, index: usize, step_name: &str, image: &GrayImage) -> Result<()> {
    let file_name = format!(
        "{:02}_{}.png",
        index,
        step_name.to_lowercase().replace(' ', "_")
    );
    let path = run_dir.join(file_name);
    image.save(&path).map_err(|source| SegmentError::Write {
        path: path.clone(),
        source,
    })?;
    log::debug!("Debug: saved {}", path.display());
    Ok(())
}

fn create_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|source| SegmentError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

/// One stage of mask preparation
pub trait PipelineStep: Send + Sync {
    /// Transform the grayscale buffer produced by the previous step
    fn process(&self, image: GrayImage) -> Result<GrayImage>;

    /// Human-readable name for this step (used in logs and debug file names)
    fn name(&self) -> &str;
}

/// Ordered chain of steps turning a grayscale photo into a foreground mask
#[derive(Clone, Default)]
pub struct Pipeline {
    steps: Vec<Arc<dyn PipelineStep>>,
    debug: Option<DebugConfig>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save every intermediate stage below `output_dir`, one sub-directory per run
    pub fn with_debug(mut self, output_dir: impl AsRef<Path>) -> Result<Self> {
        self.debug = Some(DebugConfig::new(output_dir.as_ref().to_path_buf())?);
        Ok(self)
    }

    pub fn add_step(mut self, step: Arc<dyn PipelineStep>) -> Self {
        self.steps.push(step);
        self
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Run every step on `input`. `label` names this run's debug sub-directory
    pub fn run(&self, input: GrayImage, label: &str) -> Result<GrayImage> {
        let run_dir = match &self.debug {
            Some(debug) => {
                let dir = debug.start_run(label)?;
                save_stage(&dir, 0, "Grayscale", &input)?;
                Some(dir)
            }
            None => None,
        };

        let mut image = input;
        for (idx, step) in self.steps.iter().enumerate() {
            log::debug!("Running step: {}", step.name());
            image = step.process(image)?;

            if let Some(dir) = &run_dir {
                save_stage(dir, idx + 1, step.name(), &image)?;
            }
        }

        Ok(image)
    }
}
