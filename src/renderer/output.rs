//! Writers for rendered frames.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};

use crate::config::OutputFormat;
use crate::error::RenderError;

pub trait FrameSink {
    fn write(&mut self, index: usize, image: RgbaImage) -> Result<(), RenderError>;
    /// Flushes everything and returns the artifact path.
    fn finish(self: Box<Self>) -> Result<PathBuf, RenderError>;
}

fn create_dir(path: &Path) -> Result<(), RenderError> {
    fs::create_dir_all(path).map_err(|source| RenderError::Io {
        path: path.to_owned(),
        source,
    })
}

fn save(image: &RgbaImage, path: &Path) -> Result<(), RenderError> {
    image.save(path).map_err(|source| RenderError::Encode {
        path: path.to_owned(),
        source,
    })
}

/// Opens the sink for `format` under `output_dir`, named after the scene.
pub fn sink_for(
    format: OutputFormat,
    output_dir: &Path,
    scene_name: &str,
    fps: u32,
) -> Result<Box<dyn FrameSink>, RenderError> {
    create_dir(output_dir)?;
    Ok(match format {
        OutputFormat::Png => Box::new(PngSequence::new(output_dir.join(scene_name))?),
        OutputFormat::Gif => Box::new(GifWriter::create(
            output_dir.join(format!("{scene_name}.gif")),
            fps,
        )?),
        OutputFormat::LastFrame => Box::new(LastFrame::new(
            output_dir.join(format!("{scene_name}.png")),
        )),
    })
}

/// `frame_00000.png`, `frame_00001.png`, ... in one directory.
pub struct PngSequence {
    dir: PathBuf,
    written: usize,
}

impl PngSequence {
    pub fn new(dir: PathBuf) -> Result<Self, RenderError> {
        create_dir(&dir)?;
        Ok(Self { dir, written: 0 })
    }

    pub fn frame_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("frame_{index:05}.png"))
    }
}

impl FrameSink for PngSequence {
    fn write(&mut self, index: usize, image: RgbaImage) -> Result<(), RenderError> {
        save(&image, &self.frame_path(index))?;
        self.written += 1;
        Ok(())
    }

    fn finish(self: Box<Self>) -> Result<PathBuf, RenderError> {
        log::info!("wrote {} frame(s) to {}", self.written, self.dir.display());
        Ok(self.dir)
    }
}

pub struct GifWriter {
    path: PathBuf,
    encoder: GifEncoder<BufWriter<File>>,
    delay: Delay,
}

impl GifWriter {
    pub fn create(path: PathBuf, fps: u32) -> Result<Self, RenderError> {
        let file = File::create(&path).map_err(|source| RenderError::Io {
            path: path.clone(),
            source,
        })?;
        let mut encoder = GifEncoder::new(BufWriter::new(file));
        encoder
            .set_repeat(Repeat::Infinite)
            .map_err(|source| RenderError::Encode {
                path: path.clone(),
                source,
            })?;
        Ok(Self {
            path,
            encoder,
            delay: Delay::from_numer_denom_ms(1000, fps.max(1)),
        })
    }
}

impl FrameSink for GifWriter {
    fn write(&mut self, _index: usize, image: RgbaImage) -> Result<(), RenderError> {
        self.encoder
            .encode_frame(Frame::from_parts(image, 0, 0, self.delay))
            .map_err(|source| RenderError::Encode {
                path: self.path.clone(),
                source,
            })
    }

    fn finish(self: Box<Self>) -> Result<PathBuf, RenderError> {
        let GifWriter { path, encoder, .. } = *self;
        // the trailer is written when the encoder drops
        drop(encoder);
        log::info!("wrote {}", path.display());
        Ok(path)
    }
}

/// Keeps only the most recent frame and saves it on finish.
pub struct LastFrame {
    path: PathBuf,
    image: Option<RgbaImage>,
}

impl LastFrame {
    pub fn new(path: PathBuf) -> Self {
        Self { path, image: None }
    }
}

impl FrameSink for LastFrame {
    fn write(&mut self, _index: usize, image: RgbaImage) -> Result<(), RenderError> {
        self.image = Some(image);
        Ok(())
    }

    fn finish(self: Box<Self>) -> Result<PathBuf, RenderError> {
        if let Some(image) = &self.image {
            save(image, &self.path)?;
            log::info!("wrote {}", self.path.display());
        } else {
            log::warn!("no frame was rendered, {} not written", self.path.display());
        }
        Ok(self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("eigenvis-{}-{name}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn solid(value: u8) -> RgbaImage {
        RgbaImage::from_pixel(4, 3, image::Rgba([value, value, value, 255]))
    }

    #[test]
    fn png_sequence_numbers_frames() {
        let dir = scratch("png");
        let mut sink = sink_for(OutputFormat::Png, &dir, "Scene", 30).unwrap();
        sink.write(0, solid(0)).unwrap();
        sink.write(1, solid(255)).unwrap();
        let out = sink.finish().unwrap();

        assert_eq!(out, dir.join("Scene"));
        assert!(out.join("frame_00000.png").is_file());
        let second = image::open(out.join("frame_00001.png")).unwrap().to_rgba8();
        assert_eq!(second.get_pixel(0, 0).0, [255, 255, 255, 255]);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn gif_is_written_on_finish() {
        let dir = scratch("gif");
        let mut sink = sink_for(OutputFormat::Gif, &dir, "Scene", 15).unwrap();
        for i in 0..3 {
            sink.write(i, solid(i as u8 * 100)).unwrap();
        }
        let out = sink.finish().unwrap();
        assert_eq!(out, dir.join("Scene.gif"));
        let bytes = fs::read(&out).unwrap();
        assert!(bytes.starts_with(b"GIF89a"));
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn last_frame_keeps_only_the_final_image() {
        let dir = scratch("last");
        let mut sink = sink_for(OutputFormat::LastFrame, &dir, "Scene", 30).unwrap();
        sink.write(0, solid(10)).unwrap();
        sink.write(1, solid(200)).unwrap();
        let out = sink.finish().unwrap();
        let image = image::open(&out).unwrap().to_rgba8();
        assert_eq!(image.get_pixel(3, 2).0, [200, 200, 200, 255]);
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 1);
        fs::remove_dir_all(dir).unwrap();
    }
}
