use crate::foundation::core::{CanvasSize, Rgb8};
use crate::foundation::error::{SketchlapseError, SketchlapseResult};
use crate::render::canvas::Canvas;

/// A composited output frame as tightly packed RGB8 pixels, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGB {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGB8 bytes, `width * height * 3` long.
    pub data: Vec<u8>,
}

impl FrameRGB {
    /// Allocate a frame filled with `bg`.
    pub fn filled(width: u32, height: u32, bg: Rgb8) -> Self {
        Self {
            width,
            height,
            data: bg.to_array().repeat(width as usize * height as usize),
        }
    }

    /// Color at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 3;
        Some(Rgb8::new(self.data[i], self.data[i + 1], self.data[i + 2]))
    }
}

/// How the source canvas is mapped onto the output frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FitMode {
    /// Uniform scale preserving aspect ratio, centered, margins filled with the margin color.
    #[default]
    Fit,
    /// Independent per-axis scale covering the whole frame.
    Stretch,
}

/// Destination rectangle of the scaled canvas inside the output frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Placement {
    /// Compute where a `src` canvas lands in an `out_w x out_h` frame.
    ///
    /// Fit mode truncates the scaled size toward zero and splits the leftover margin with floor
    /// division, so any odd pixel goes to the right/bottom margin.
    pub fn compute(src: CanvasSize, out_w: u32, out_h: u32, mode: FitMode) -> Self {
        match mode {
            FitMode::Stretch => Self {
                x: 0,
                y: 0,
                width: out_w,
                height: out_h,
            },
            FitMode::Fit => {
                let scale_w = f64::from(out_w) / f64::from(src.width);
                let scale_h = f64::from(out_h) / f64::from(src.height);
                let scale = scale_w.min(scale_h);
                let width = ((f64::from(src.width) * scale) as u32).min(out_w);
                let height = ((f64::from(src.height) * scale) as u32).min(out_h);
                Self {
                    x: (out_w - width) / 2,
                    y: (out_h - height) / 2,
                    width,
                    height,
                }
            }
        }
    }
}

/// Nearest-neighbour compositor for one fixed (canvas size, output size, mode) combination.
///
/// The sampling maps are computed once and reused for every frame of a render.
#[derive(Clone, Debug)]
pub struct Compositor {
    src: CanvasSize,
    out_w: u32,
    out_h: u32,
    placement: Placement,
    margin_bg: Rgb8,
    col_map: Vec<usize>,
    row_map: Vec<usize>,
}

impl Compositor {
    /// Precompute the placement and sampling maps for `src` into an `out_w`x`out_h` frame.
    pub fn new(
        src: CanvasSize,
        out_w: u32,
        out_h: u32,
        mode: FitMode,
        margin_bg: Rgb8,
    ) -> SketchlapseResult<Self> {
        if out_w == 0 || out_h == 0 {
            return Err(SketchlapseError::validation(format!(
                "output frame size must be non-zero, got {out_w}x{out_h}"
            )));
        }
        let placement = Placement::compute(src, out_w, out_h, mode);
        Ok(Self {
            src,
            out_w,
            out_h,
            placement,
            margin_bg,
            col_map: nearest_map(src.width, placement.width),
            row_map: nearest_map(src.height, placement.height),
        })
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    /// A frame of the right size, ready for [`Compositor::compose`].
    pub fn new_frame(&self) -> FrameRGB {
        FrameRGB::filled(self.out_w, self.out_h, self.margin_bg)
    }

    /// Overwrite `frame` with the current state of `canvas`.
    pub fn compose(&self, canvas: &Canvas, frame: &mut FrameRGB) -> SketchlapseResult<()> {
        if canvas.size() != self.src {
            return Err(SketchlapseError::validation(format!(
                "canvas size mismatch: got {}x{}, compositor built for {}x{}",
                canvas.size().width,
                canvas.size().height,
                self.src.width,
                self.src.height
            )));
        }
        if frame.width != self.out_w || frame.height != self.out_h {
            return Err(SketchlapseError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, self.out_w, self.out_h
            )));
        }

        let bg = self.margin_bg.to_array();
        for px in frame.data.chunks_exact_mut(3) {
            px.copy_from_slice(&bg);
        }

        let stride = self.out_w as usize * 3;
        let src_stride = self.src.width as usize * 3;
        let x0 = self.placement.x as usize * 3;
        let row_len = self.placement.width as usize * 3;
        let src = canvas.data();

        let mut prev: Option<(usize, usize)> = None;
        for (dy, &sy) in self.row_map.iter().enumerate() {
            let dst_start = (self.placement.y as usize + dy) * stride + x0;
            if let Some((prev_sy, prev_start)) = prev
                && prev_sy == sy
            {
                frame
                    .data
                    .copy_within(prev_start..prev_start + row_len, dst_start);
                continue;
            }

            let src_row = &src[sy * src_stride..(sy + 1) * src_stride];
            let dst_row = &mut frame.data[dst_start..dst_start + row_len];
            for (d, &sx) in dst_row.chunks_exact_mut(3).zip(&self.col_map) {
                d.copy_from_slice(&src_row[sx * 3..sx * 3 + 3]);
            }
            prev = Some((sy, dst_start));
        }
        Ok(())
    }
}

/// For each of `dst` output positions, the source index it samples from.
fn nearest_map(src: u32, dst: u32) -> Vec<usize> {
    (0..u64::from(dst))
        .map(|d| ((d * u64::from(src)) / u64::from(dst)).min(u64::from(src) - 1) as usize)
        .collect()
}

/// One-shot composite of `canvas` into a fresh `out_w x out_h` frame.
pub fn composite(
    canvas: &Canvas,
    out_w: u32,
    out_h: u32,
    mode: FitMode,
    margin_bg: Rgb8,
) -> SketchlapseResult<FrameRGB> {
    let compositor = Compositor::new(canvas.size(), out_w, out_h, mode, margin_bg)?;
    let mut frame = compositor.new_frame();
    compositor.compose(canvas, &mut frame)?;
    Ok(frame)
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
