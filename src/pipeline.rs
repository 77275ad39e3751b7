use anyhow::Result;
use image::DynamicImage;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Debug configuration for pipeline execution
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Root directory for debug outputs
    pub output_dir: PathBuf,
    /// Whether debug mode is enabled
    pub enabled: bool,
}

impl DebugConfig {
    /// Prepare a debug output directory.
    /// The directory must be empty or non-existent
    pub fn prepare(output_dir: PathBuf) -> Result<Self> {
        if output_dir.exists() {
            let entries = std::fs::read_dir(&output_dir)?;
            if entries.count() > 0 {
                return Err(anyhow::anyhow!(
                    "Debug directory is not empty: {}",
                    output_dir.display()
                ));
            }
        } else {
            std::fs::create_dir_all(&output_dir)?;
        }

        Ok(Self {
            output_dir,
            enabled: true,
        })
    }

    /// Save one intermediate image as `<stage_dir>/<frame>.png`
    pub fn save(
        &self,
        stage_dir: &str,
        frame_number: usize,
        image: &DynamicImage,
    ) -> Result<PathBuf> {
        let dir = self.output_dir.join(stage_dir);
        std::fs::create_dir_all(&dir)?;
        let path = dir.join(format!("{:05}.png", frame_number));
        image
            .save(&path)
            .map_err(|e| anyhow::anyhow!("Failed to save debug image: {}", e))?;
        Ok(path)
    }

    pub fn dir(&self) -> &Path {
        &self.output_dir
    }
}

/// Context available to all pipeline steps
#[derive(Clone, Debug, Default)]
pub struct PipelineContext {
    /// 1-based number of the frame being processed
    pub frame_number: usize,
    pub debug: Option<DebugConfig>,
}

/// Trait that all image stages must implement
pub trait PipelineStep: Send + Sync {
    /// Transform one image into the next
    fn process(&self, image: DynamicImage, context: &PipelineContext) -> Result<DynamicImage>;

    /// Human-readable name for this step (used in logs and debug folder names)
    fn name(&self) -> &str;
}

/// Ordered chain of image stages
pub struct Pipeline {
    label: String,
    steps: Vec<Box<dyn PipelineStep>>,
}

impl Pipeline {
    /// Create a new empty pipeline; `label` prefixes its debug folders
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            steps: Vec::new(),
        }
    }

    /// Add a processing step to the pipeline
    pub fn add_step(mut self, step: Box<dyn PipelineStep>) -> Self {
        self.steps.push(step);
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Run every step in order, saving each result when debug output is on
    pub fn run(&self, input: DynamicImage, context: &PipelineContext) -> Result<DynamicImage> {
        let mut image = input;

        for (step_idx, step) in self.steps.iter().enumerate() {
            let step_name = step.name();
            image = step.process(image, context)?;

            if let Some(debug_config) = &context.debug {
                if debug_config.enabled {
                    let step_dir_name = format!(
                        "{}_{:02}_{}",
                        self.label,
                        step_idx + 1,
                        step_name.to_lowercase().replace(' ', "_")
                    );
                    let path = debug_config.save(&step_dir_name, context.frame_number, &image)?;
                    debug!("Debug: saved {}", path.display());
                }
            }
        }

        Ok(image)
    }
}
