use std::path::{Path, PathBuf};

use imageproc::drawing::draw_cross_mut;

use crate::foundation::core::{PixelCoord, Rgb, RgbImage};
use crate::foundation::error::{MorphError, MorphResult};

/// Surface that renders the blended canvas with the selection cursor.
///
/// Frames arrive in strictly increasing iteration order.
pub trait DisplayPort {
    fn show_frame(
        &mut self,
        iteration: u64,
        frame: &RgbImage,
        cursor: PixelCoord,
    ) -> MorphResult<()>;
}

/// In-memory display for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemoryDisplay {
    /// Frames in presentation order.
    pub frames: Vec<(u64, RgbImage, PixelCoord)>,
}

impl InMemoryDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&(u64, RgbImage, PixelCoord)> {
        self.frames.last()
    }
}

impl DisplayPort for InMemoryDisplay {
    fn show_frame(
        &mut self,
        iteration: u64,
        frame: &RgbImage,
        cursor: PixelCoord,
    ) -> MorphResult<()> {
        self.frames.push((iteration, frame.clone(), cursor));
        Ok(())
    }
}

/// Writes every presented frame as `<dir>/<prefix>_<iteration>.png`, with the cursor drawn as a
/// small cross.
#[derive(Debug)]
pub struct PngSequenceDisplay {
    dir: PathBuf,
    prefix: String,
    cursor_color: Option<Rgb<u8>>,
    written: Vec<PathBuf>,
}

impl PngSequenceDisplay {
    /// Create the target directory if needed.
    pub fn new(dir: impl AsRef<Path>, prefix: impl Into<String>) -> MorphResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir).map_err(|e| {
            MorphError::validation(format!("create frame directory '{}': {e}", dir.display()))
        })?;
        Ok(Self {
            dir,
            prefix: prefix.into(),
            cursor_color: Some(Rgb([255, 0, 0])),
            written: Vec::new(),
        })
    }

    /// Draw the cursor in `color`, or not at all.
    pub fn with_cursor_color(mut self, color: Option<Rgb<u8>>) -> Self {
        self.cursor_color = color;
        self
    }

    /// Paths written so far, in order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn path_for(&self, iteration: u64) -> PathBuf {
        self.dir.join(format!("{}_{iteration:06}.png", self.prefix))
    }
}

impl DisplayPort for PngSequenceDisplay {
    fn show_frame(
        &mut self,
        iteration: u64,
        frame: &RgbImage,
        cursor: PixelCoord,
    ) -> MorphResult<()> {
        let path = self.path_for(iteration);
        let result = match self.cursor_color {
            Some(color) => {
                let mut overlay = frame.clone();
                draw_cross_mut(&mut overlay, color, cursor.x as i32, cursor.y as i32);
                overlay.save(&path)
            }
            None => frame.save(&path),
        };
        result.map_err(|e| {
            MorphError::evaluation(format!("write frame '{}': {e}", path.display()))
        })?;
        tracing::debug!(iteration, path = %path.display(), "frame written");
        self.written.push(path);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/display/port.rs"]
mod tests;
